// Flow 模块 - 载荷规范化、校验与 Klaviyo 流程定义构建

pub mod definition;
pub mod normalize;
pub mod types;
pub mod validation;

// 重新导出核心类型
pub use definition::{
    build_create_flow_request, build_flow_definition, ActionKind, ActionLinks, BuildError,
    CreateFlowRequest, CustomTrackingParam, EmailMessage, FlowAction, FlowDefinition,
    SendEmailData, TimeDelayData, TriggerNode, SEND_EMAIL_ACTION, TIME_DELAY_ACTION,
};
pub use normalize::{is_truthy, normalize_submission};
pub use types::{
    Delay, DelaySubmission, DelayUnit, EmailStep, FlowRequest, FlowSubmission, StepStatus,
    StepSubmission, TrackingParam, Trigger, TriggerKind, TriggerSubmission, DEFAULT_TIMEZONE,
};
pub use validation::{validate_flow_request, StepField, ValidationError};
