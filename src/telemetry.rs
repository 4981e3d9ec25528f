use crate::prompt::Visibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCreationStatus {
    Created,
    Failed,
}

pub fn log_remote_creation_attempt(
    name: &str,
    visibility: Visibility,
    status: RemoteCreationStatus,
    message: &str,
) {
    eprintln!(
        "[create-remote] name={name} private={} status={status:?} message={}",
        visibility.is_private(),
        single_line(message)
    );
}

fn single_line(message: &str) -> String {
    message.split_whitespace().collect::<Vec<_>>().join(" ")
}
