use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShimError {
    #[error("command `{command}` failed with {status}: {stderr}", status = exit_status(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}
