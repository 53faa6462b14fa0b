use revoke_lib::analytics::{AnalyticsSink, Properties};
use revoke_lib::notify::{NotificationSink, Placement, SubmittedNotice};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum NotificationRecord {
    Submitted(SubmittedNotice),
    Error { message: String, placement: Placement },
}

#[derive(Debug, Default)]
pub struct RecordingNotificationSink {
    records: Mutex<Vec<NotificationRecord>>,
}

impl RecordingNotificationSink {
    pub fn records(&self) -> Vec<NotificationRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<SubmittedNotice> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                NotificationRecord::Submitted(notice) => Some(notice),
                NotificationRecord::Error { .. } => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<(String, Placement)> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                NotificationRecord::Error { message, placement } => Some((message, placement)),
                NotificationRecord::Submitted(_) => None,
            })
            .collect()
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn notify_submitted(&self, notice: &SubmittedNotice) {
        log::debug!("Recorded submitted notice {}", notice.correlation_token);
        self.records
            .lock()
            .unwrap()
            .push(NotificationRecord::Submitted(notice.clone()));
    }

    fn notify_error(&self, message: &str, placement: Placement) {
        self.records.lock().unwrap().push(NotificationRecord::Error {
            message: message.to_string(),
            placement,
        });
    }
}

#[derive(Debug, Default)]
pub struct RecordingAnalyticsSink {
    events: Mutex<Vec<(String, Properties)>>,
}

impl RecordingAnalyticsSink {
    pub fn events(&self) -> Vec<(String, Properties)> {
        self.events.lock().unwrap().clone()
    }
}

impl AnalyticsSink for RecordingAnalyticsSink {
    fn record(&self, event_name: &str, properties: &Properties) {
        self.events
            .lock()
            .unwrap()
            .push((event_name.to_string(), properties.clone()));
    }
}
