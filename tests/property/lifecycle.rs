use proptest::prelude::*;
use childexec::controller::{ExitInfo, Lifecycle, ProcessEvent, StdStream};
use childexec::Encoding;

#[derive(Debug, Clone)]
enum Step {
    Data(StdStream, Vec<u8>),
    Close(StdStream),
    Exit(i32),
    Fail,
}

fn stream() -> impl Strategy<Value = StdStream> {
    prop_oneof![Just(StdStream::Stdout), Just(StdStream::Stderr)]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (stream(), proptest::collection::vec(any::<u8>(), 0..16))
            .prop_map(|(s, bytes)| Step::Data(s, bytes)),
        2 => stream().prop_map(Step::Close),
        1 => (0i32..4).prop_map(Step::Exit),
        1 => Just(Step::Fail),
    ]
}

fn to_event(step: Step) -> ProcessEvent {
    match step {
        Step::Data(stream, chunk) => ProcessEvent::Data { stream, chunk },
        Step::Close(stream) => ProcessEvent::StreamClosed { stream },
        Step::Exit(code) => ProcessEvent::Exited(ExitInfo::code(code)),
        Step::Fail => ProcessEvent::InputError(std::io::Error::other("write failed")),
    }
}

proptest! {
    #[test]
    fn settles_at_most_once(steps in proptest::collection::vec(step(), 0..40)) {
        let mut lifecycle = Lifecycle::new(true, Some(Encoding::Buffer));
        lifecycle.watch_stream();
        lifecycle.watch_stream();

        let settlements = steps
            .into_iter()
            .map(to_event)
            .filter_map(|event| lifecycle.step(event))
            .count();

        prop_assert!(settlements <= 1);
        prop_assert_eq!(settlements == 1, lifecycle.is_settled());
    }

    #[test]
    fn buffered_bytes_are_concatenated_in_order(
        chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..32), 0..10),
    ) {
        let mut lifecycle = Lifecycle::new(true, Some(Encoding::Buffer));
        lifecycle.watch_stream();

        for chunk in &chunks {
            let data = ProcessEvent::Data {
                stream: StdStream::Stdout,
                chunk: chunk.clone(),
            };
            let settled = lifecycle.step(data);
            prop_assert!(settled.is_none(), "data must not settle");
        }
        let settled = lifecycle.step(ProcessEvent::Exited(ExitInfo::code(0)));
        prop_assert!(settled.is_none(), "stdout is still open");
        let settled = lifecycle
            .step(ProcessEvent::StreamClosed { stream: StdStream::Stdout })
            .unwrap();

        let expected: Vec<u8> = chunks.concat();
        prop_assert!(settled.verdict.is_success());
        prop_assert_eq!(settled.stdout.map(|o| o.into_bytes()), Some(expected));
    }
}
