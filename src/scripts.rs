//! Generated shell scripts: the stub proxy and the activation script.

/// File name of the proxy every stub links to.
pub const PROXY_NAME: &str = "rustenv-proxy";

/// File name of the activation script.
pub const ACTIVATE_NAME: &str = "activate";

/// Shell function defined by the activation script.
pub const DEACTIVATE_FUNCTION: &str = "deactivate_rustenv";

/// Names in the environment `bin/` that a toolchain binary may not take.
pub const RESERVED_NAMES: [&str; 2] = [PROXY_NAME, ACTIVATE_NAME];

/// Content of `.gitignore` at the environment root.
pub const GITIGNORE: &str = "# created by rustenv automatically\n*\n";

/// Toolchain binaries are rustup shims that need `RUSTUP_HOME` and
/// `CARGO_HOME` on every call. The proxy follows `$0` through any symlinks
/// to its own file, takes the parent of its `bin/` as the environment root,
/// and execs the real binary named after the link it was called through.
pub const PROXY: &str = r#"#!/bin/sh
set -eu

name="$(basename "$0")"
if [ "$name" = "rustenv-proxy" ]; then
    echo "rustenv-proxy: run a toolchain binary through its link in this directory" >&2
    exit 1
fi

self="$0"
while [ -L "$self" ]; do
    target="$(readlink "$self")"
    case "$target" in
        /*) self="$target" ;;
        *) self="$(dirname "$self")/$target" ;;
    esac
done

rustenv="$(cd -P "$(dirname "$self")/.." && pwd -P)"
rustinstall="$rustenv/rust"
export CARGO_HOME="$rustinstall"
export RUSTUP_HOME="$rustinstall"
exec "$rustinstall/bin/$name" "$@"
"#;

const ACTIVATE_TEMPLATE: &str = r#"# This file must be used with ". bin/activate" from a POSIX shell.
# You cannot run it directly.

_RUSTENV_BIN_PATH={BIN_PATH}
_RUSTENV_NAME={NAME}

_RUSTENV_OLD_PS1="${PS1-}"
_RUSTENV_OLD_PATH="$PATH"

export PATH="$_RUSTENV_BIN_PATH:$PATH"
export PS1="($_RUSTENV_NAME) ${PS1-}"
hash -r 2>/dev/null

{DEACTIVATE}() {
    export PS1="$_RUSTENV_OLD_PS1"
    export PATH="$_RUSTENV_OLD_PATH"
    hash -r 2>/dev/null

    unset _RUSTENV_NAME
    unset _RUSTENV_BIN_PATH
    unset _RUSTENV_OLD_PS1
    unset _RUSTENV_OLD_PATH
}
"#;

/// Render the activation script.
///
/// `bin_path` is the `:`-separated prefix put in front of `PATH`, `name` the
/// label shown in the prompt.
pub fn render_activate(bin_path: &str, name: &str) -> String {
    ACTIVATE_TEMPLATE
        .replace("{DEACTIVATE}", DEACTIVATE_FUNCTION)
        .replace("{BIN_PATH}", &shell_quote(bin_path))
        .replace("{NAME}", &shell_quote(name))
}

/// Quote a value for a POSIX shell as one single-quoted word.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
