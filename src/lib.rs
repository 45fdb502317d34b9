pub mod config;
pub mod error;
pub mod flow;
pub mod form;
pub mod handler;
pub mod klaviyo;
pub mod server;
pub mod utils;

pub use config::{EnvConfig, FlowServiceConfig};
pub use error::{FlowBuilderError, Result};
pub use flow::{
    build_create_flow_request, build_flow_definition, normalize_submission,
    validate_flow_request, BuildError, CreateFlowRequest, Delay, DelayUnit, EmailStep,
    FlowDefinition, FlowRequest, FlowSubmission, StepStatus, TrackingParam, Trigger, TriggerKind,
    ValidationError,
};
pub use form::{FormClient, FormError, FormState, StepForm, SubmissionOutcome, TrackingRow};
pub use handler::{
    parse_submission, prepare_create_flow, FlowRequestHandler, FlowServiceError, HandlerResponse,
};
pub use klaviyo::{
    DynFlowsApi, FlowsApi, KlaviyoClient, ProviderError, ProviderResponse, RecordingFlowsApi,
};
pub use server::{ApiServer, ServerConfig};
pub use utils::{logging, validation};
