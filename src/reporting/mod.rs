pub mod log;
pub mod writer;

pub type LogSender = tokio::sync::mpsc::UnboundedSender<log::Log>;
pub type LogReceiver = tokio::sync::mpsc::UnboundedReceiver<log::Log>;

pub fn channel() -> (LogSender, LogReceiver) {
    tokio::sync::mpsc::unbounded_channel::<log::Log>()
}
