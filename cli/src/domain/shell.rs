//! POSIX shell quoting for commands sent through `vagrant ssh -c`.

/// Quote `arg` for `sh` when it contains anything beyond a safe set.
#[must_use]
pub fn quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@%+".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Join a program and its arguments into one shell command line.
#[must_use]
pub fn join(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .map(quote)
        .collect::<Vec<_>>()
        .join(" ")
}
