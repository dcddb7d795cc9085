use crate::reporting::LogReceiver;
use crate::reporting::log;

use std::fs::File;
use std::io::{Write, stderr};
use std::path::PathBuf;

/// Drains the log channel until every sender is gone.
pub struct LogWriter {
    log_receiver: LogReceiver,
    log_file: Option<File>,
    log_level: log::Level
}

impl LogWriter {
    pub fn create(log_receiver: LogReceiver, log_file_path: Option<PathBuf>, log_level: log::Level) -> Result<Self, std::io::Error> {
        let log_file = match log_file_path {
            Some(path) => Some(File::create(path)?),
            None => None
        };

        Ok(LogWriter { log_receiver: log_receiver, log_file: log_file, log_level: log_level })
    }

    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(mut self) {
        while let Some(received_log) = self.log_receiver.recv().await {
            if received_log.get_level() < self.log_level {
                continue;
            }

            match self.log_file.as_mut() {
                Some(file) => {
                    if let Err(e) = file.write_all(format!("{}\n", received_log).as_bytes()) {
                        let _ = writeln!(stderr(), "{}", log::create("writer", log::Level::Error, format!("Could not save log to file: {}", e)));
                        let _ = writeln!(stderr(), "{}", received_log);
                    }
                    else {
                        let _ = file.flush();
                    }
                }
                None => { let _ = writeln!(stderr(), "{}", received_log); }
            }
        }
    }
}

#[tokio::test]
async fn test_log_writer_filters_by_level() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("climbsafe.log");
    let (log_sender, log_receiver) = crate::reporting::channel();
    let writer = LogWriter::create(log_receiver, Some(path.clone()), log::Level::Info).unwrap();

    assert!(log_sender.send(log::create("test", log::Level::Debug, "hidden".to_string())).is_ok());
    assert!(log_sender.send(log::create("test", log::Level::Info, "guide registered".to_string())).is_ok());
    assert!(log_sender.send(log::create("test", log::Level::Error, "guide not found".to_string())).is_ok());
    drop(log_sender);
    assert!(writer.start().await.is_ok());

    let content = std::fs::read_to_string(path).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("[test][Info] guide registered"));
    assert!(lines[1].ends_with("[test][Error] guide not found"));
}
