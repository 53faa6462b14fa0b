mod accounts;
mod mock_provider;
mod recording;

pub use accounts::*;
pub use mock_provider::{ConfirmationGate, MockContractHandle, MockSigningProvider, SubmittedCall};
pub use recording::{NotificationRecord, RecordingAnalyticsSink, RecordingNotificationSink};

/// Logger for tests, safe to call from every test
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
