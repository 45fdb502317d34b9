//! 表单状态与提交客户端

pub mod client;
pub mod outcome;
pub mod state;

pub use client::FormClient;
pub use outcome::SubmissionOutcome;
pub use state::{DelayForm, FormError, FormState, StepForm, TrackingRow};
