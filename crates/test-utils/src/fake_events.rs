use std::io;

use childexec::controller::{ExitInfo, Lifecycle, ProcessEvent, Settled, StdStream};

/// A scripted sequence of `ProcessEvent`s, standing in for a real child.
///
/// ```ignore
/// let events = EventScript::new().stdout("hi\n").close_streams().exit(0).build();
/// ```
#[derive(Debug, Default)]
pub struct EventScript {
    events: Vec<ProcessEvent>,
}

impl EventScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(mut self, chunk: &str) -> Self {
        self.events.push(ProcessEvent::Data {
            stream: StdStream::Stdout,
            chunk: chunk.as_bytes().to_vec(),
        });
        self
    }

    pub fn stderr(mut self, chunk: &str) -> Self {
        self.events.push(ProcessEvent::Data {
            stream: StdStream::Stderr,
            chunk: chunk.as_bytes().to_vec(),
        });
        self
    }

    pub fn bytes(mut self, stream: StdStream, chunk: &[u8]) -> Self {
        self.events.push(ProcessEvent::Data {
            stream,
            chunk: chunk.to_vec(),
        });
        self
    }

    pub fn close(mut self, stream: StdStream) -> Self {
        self.events.push(ProcessEvent::StreamClosed { stream });
        self
    }

    /// Close stdout, then stderr.
    pub fn close_streams(self) -> Self {
        self.close(StdStream::Stdout).close(StdStream::Stderr)
    }

    pub fn stream_error(mut self, stream: StdStream, message: &str) -> Self {
        self.events.push(ProcessEvent::StreamError {
            stream,
            error: io::Error::other(message.to_string()),
        });
        self
    }

    pub fn input_error(mut self, kind: io::ErrorKind) -> Self {
        self.events.push(ProcessEvent::InputError(io::Error::from(kind)));
        self
    }

    pub fn process_error(mut self, kind: io::ErrorKind) -> Self {
        self.events.push(ProcessEvent::ProcessError(io::Error::from(kind)));
        self
    }

    pub fn exit(mut self, code: i32) -> Self {
        self.events.push(ProcessEvent::Exited(ExitInfo::code(code)));
        self
    }

    pub fn killed(mut self, signal: &str) -> Self {
        self.events.push(ProcessEvent::Exited(ExitInfo::signal(signal)));
        self
    }

    pub fn build(self) -> Vec<ProcessEvent> {
        self.events
    }

    /// Feed every event into `lifecycle`, collecting each settlement.
    ///
    /// A well-behaved lifecycle yields at most one element.
    pub fn drive(self, lifecycle: &mut Lifecycle) -> Vec<Settled> {
        self.events
            .into_iter()
            .filter_map(|event| lifecycle.step(event))
            .collect()
    }
}
