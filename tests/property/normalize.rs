use proptest::prelude::*;
use childexec::{normalize_arguments, Arg, ArgumentError, ArgumentRole, ProcessOptions};

// Tokens without the default separator, so the command is taken verbatim.
fn token() -> impl Strategy<Value = String> {
    "[a-z0-9._/-]{1,12}"
}

fn options_strategy() -> impl Strategy<Value = ProcessOptions> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(silent, inherit, ignore, buffer)| ProcessOptions {
            silent,
            inherit,
            ignore,
            buffer: Some(buffer),
            ..Default::default()
        },
    )
}

proptest! {
    #[test]
    fn order_of_roles_does_not_matter(
        command in token(),
        argv in proptest::collection::vec(token(), 0..5),
        options in options_strategy(),
        order in Just(vec![0usize, 1, 2]).prop_shuffle(),
    ) {
        let parts = [
            Arg::Command(command.clone()),
            Arg::Argv(argv.clone()),
            Arg::Options(options.clone()),
        ];
        let canonical = normalize_arguments(parts.clone()).unwrap();
        let shuffled: Vec<Arg> = order.iter().map(|&i| parts[i].clone()).collect();

        prop_assert_eq!(normalize_arguments(shuffled).unwrap(), canonical.clone());
        prop_assert_eq!(canonical.command, command);
        prop_assert_eq!(canonical.argv, argv);
    }

    #[test]
    fn normalization_is_deterministic(
        command in token(),
        argv in proptest::collection::vec(token(), 0..5),
        options in options_strategy(),
    ) {
        let list = vec![
            Arg::Options(options),
            Arg::Command(command),
            Arg::Argv(argv),
        ];
        prop_assert_eq!(
            normalize_arguments(list.clone()),
            normalize_arguments(list)
        );
    }

    #[test]
    fn any_repeated_role_is_rejected(
        command in token(),
        argv in proptest::collection::vec(token(), 0..3),
        repeated in 0usize..3,
    ) {
        let mut list = vec![
            Arg::Command(command.clone()),
            Arg::Argv(argv.clone()),
            Arg::Options(ProcessOptions::default()),
        ];
        let (extra, role) = match repeated {
            0 => (Arg::Command(command), ArgumentRole::Command),
            1 => (Arg::Argv(argv), ArgumentRole::Argv),
            _ => (Arg::Options(ProcessOptions::default()), ArgumentRole::Options),
        };
        list.push(extra);

        prop_assert_eq!(
            normalize_arguments(list).unwrap_err(),
            ArgumentError::Duplicate(role)
        );
    }

    #[test]
    fn split_round_trips_through_the_separator(
        tokens in proptest::collection::vec(token(), 1..6),
    ) {
        let line = tokens.join(" ");
        let invocation = normalize_arguments(vec![
            Arg::Command(line),
            Arg::Options(ProcessOptions::default()),
        ])
        .unwrap();

        prop_assert_eq!(&invocation.command, &tokens[0]);
        prop_assert_eq!(&invocation.argv[..], &tokens[1..]);
    }
}
