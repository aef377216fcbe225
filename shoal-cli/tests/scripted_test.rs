// This file is part of shoal, an interactive POSIX-style shell.
// Copyright (C) 2026 the shoal developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! End-to-end tests running the built shell binary with `-c`

use std::process::{Command, Output};

fn run(script: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shoal"))
        .arg("--norc")
        .arg("-c")
        .arg(script)
        .output()
        .expect("the shell binary should run")
}

fn stdout_of(script: &str) -> String {
    let output = run(script);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn status_of(script: &str) -> i32 {
    run(script).status.code().expect("the shell should exit normally")
}

#[test]
fn simple_echo() {
    assert_eq!(stdout_of("echo hello world"), "hello world\n");
}

#[test]
fn variable_assignment_and_expansion() {
    assert_eq!(stdout_of("x=alpha; echo $x ${x}bet"), "alpha alphabet\n");
}

#[test]
fn for_loop_over_command_substitution() {
    assert_eq!(
        stdout_of("for i in $(echo 1 2 3); do echo \"n:$i\"; done"),
        "n:1\nn:2\nn:3\n"
    );
}

#[test]
fn parameter_defaults_and_assignment() {
    assert_eq!(stdout_of("x=; echo ${x:-default}"), "default\n");
    assert_eq!(stdout_of("x=; echo ${x:=set}; echo $x"), "set\nset\n");
}

#[test]
fn heredoc_with_tab_stripping() {
    assert_eq!(
        stdout_of("if true; then cat <<-EOF\n\t\thi\n\tEOF\nfi"),
        "hi\n"
    );
}

#[test]
fn subshell_does_not_leak_assignments() {
    assert_eq!(stdout_of("a=1; (a=2); echo $a"), "1\n");
}

#[test]
fn pipeline() {
    assert_eq!(stdout_of("echo one | tr a-z A-Z"), "ONE\n");
    assert_eq!(status_of("echo one | tr a-z A-Z"), 0);
}

#[test]
fn pipeline_status_is_last_stage() {
    assert_eq!(status_of("false | true"), 0);
    assert_ne!(status_of("true | false"), 0);
}

#[test]
fn pipefail() {
    assert_ne!(status_of("set -o pipefail; false | true"), 0);
}

#[test]
fn background_job_and_kill() {
    let output = run("sleep 30 & jobs; kill %1; wait %1; echo status:$?");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[1]+ Running sleep 30 &"), "jobs output: {stdout}");
    assert!(stdout.contains("status:143"), "wait status: {stdout}");
}

#[test]
fn exit_statuses() {
    assert_eq!(status_of("exit 7"), 7);
    assert_eq!(status_of("no-such-command-anywhere"), 127);
    assert_eq!(status_of("if true; then"), 2);
}

#[test]
fn and_or_lists() {
    assert_eq!(stdout_of("true && echo yes || echo no"), "yes\n");
    assert_eq!(stdout_of("false && echo yes || echo no"), "no\n");
}

#[test]
fn case_statement() {
    let script = "case banana in (a*) echo a;; (b*) echo b;; (*) echo other;; esac";
    assert_eq!(stdout_of(script), "b\n");
}

#[test]
fn case_fallthrough() {
    let script = "case x in (x) echo one;& (y) echo two;; (z) echo three;; esac";
    assert_eq!(stdout_of(script), "one\ntwo\n");
}

#[test]
fn arithmetic_expansion_and_command() {
    assert_eq!(stdout_of("echo $((6 * 7))"), "42\n");
    assert_eq!(status_of("((1 + 1))"), 0);
    assert_ne!(status_of("((1 - 1))"), 0);
}

#[test]
fn functions_and_locals() {
    let script = "x=outer\nf() { local x=inner; echo $x; }\nf\necho $x";
    assert_eq!(stdout_of(script), "inner\nouter\n");
}

#[test]
fn function_return_status() {
    assert_eq!(status_of("f() { return 3; }; f"), 3);
}

#[test]
fn break_and_continue() {
    let script = "for i in 1 2 3 4; do \
        if [[ $i == 2 ]]; then continue; fi; \
        if [[ $i == 4 ]]; then break; fi; \
        echo $i; done";
    assert_eq!(stdout_of(script), "1\n3\n");
}

#[test]
fn while_loop_with_arithmetic() {
    let script = "i=0; while ((i < 3)); do echo $i; ((i += 1)); done";
    assert_eq!(stdout_of(script), "0\n1\n2\n");
}

#[test]
fn c_style_for() {
    assert_eq!(
        stdout_of("for ((i=0; i<3; i++)); do echo $i; done"),
        "0\n1\n2\n"
    );
}

#[test]
fn quoted_at_preserves_fields() {
    let output = Command::new(env!("CARGO_BIN_EXE_shoal"))
        .arg("--norc")
        .arg("-c")
        .arg("for a in \"$@\"; do echo \"[$a]\"; done")
        .arg("shellname")
        .arg("one two")
        .arg("three")
        .output()
        .unwrap();
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "[one two]\n[three]\n"
    );
}

#[test]
fn word_splitting_and_ifs() {
    assert_eq!(
        stdout_of("IFS=:; v=a:b:c; for p in $v; do echo $p; done"),
        "a\nb\nc\n"
    );
}

#[test]
fn redirection_round_trip() {
    let dir = std::env::temp_dir().join(format!("shoal-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("out.txt");
    let script = format!(
        "echo first > {f}; echo second >> {f}; cat < {f}; rm {f}",
        f = file.display()
    );
    assert_eq!(stdout_of(&script), "first\nsecond\n");
    _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn stderr_redirection() {
    let script = "{ echo out; echo err >&2; } 2>/dev/null";
    assert_eq!(stdout_of(script), "out\n");
}

#[test]
fn here_string() {
    assert_eq!(stdout_of("cat <<< hello"), "hello\n");
}

#[test]
fn trims_and_substitutions() {
    assert_eq!(stdout_of("p=/usr/local/bin; echo ${p##*/}"), "bin\n");
    assert_eq!(stdout_of("f=name.tar.gz; echo ${f%%.*}"), "name\n");
    assert_eq!(stdout_of("s=banana; echo ${s//an/AN}"), "bANANa\n");
    assert_eq!(stdout_of("s=abcdef; echo ${s:2:3}"), "cde\n");
}

#[test]
fn double_bracket_tests() {
    assert_eq!(status_of("[[ abc == a* ]]"), 0);
    assert_ne!(status_of("[[ abc == b* ]]"), 0);
    assert_eq!(status_of("[[ 2 -lt 10 ]]"), 0);
    assert_eq!(status_of("[[ -n nonempty && -z \"\" ]]"), 0);
}

#[test]
fn command_substitution_sets_status() {
    assert_eq!(status_of("$(exit 5)"), 5);
}

#[test]
fn eval_builtin() {
    assert_eq!(stdout_of("cmd='echo built'; eval \"$cmd again\""), "built again\n");
}

#[test]
fn dot_sourcing_persists_variables() {
    let dir = std::env::temp_dir().join(format!("shoal-src-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("lib.sh");
    std::fs::write(&file, "sourced=yes\n").unwrap();
    let script = format!(". {}; echo $sourced", file.display());
    assert_eq!(stdout_of(&script), "yes\n");
    _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn exit_trap_runs() {
    assert_eq!(stdout_of("trap 'echo bye' EXIT; echo hi"), "hi\nbye\n");
}

#[test]
fn errexit_aborts() {
    assert_eq!(stdout_of("set -e; false; echo unreachable"), "");
    // Guarded failures do not abort.
    assert_eq!(stdout_of("set -e; false || true; echo reached"), "reached\n");
}

#[test]
fn unset_nounset_errors() {
    assert_ne!(status_of("set -u; echo $never_defined"), 0);
}

#[test]
fn tilde_expansion() {
    let output = Command::new(env!("CARGO_BIN_EXE_shoal"))
        .arg("--norc")
        .arg("-c")
        .arg("echo ~")
        .env("HOME", "/fake/home")
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout), "/fake/home\n");
}

#[test]
fn alias_substitution() {
    assert_eq!(stdout_of("alias greet='echo hi'; eval greet"), "hi\n");
}

#[test]
fn script_file_arguments() {
    let dir = std::env::temp_dir().join(format!("shoal-script-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("args.sh");
    std::fs::write(&file, "echo $0:$#:$1:$2\n").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_shoal"))
        .arg("--norc")
        .arg(file.display().to_string())
        .arg("a")
        .arg("b")
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, format!("{}:2:a:b\n", file.display()));
    _ = std::fs::remove_dir_all(&dir);
}
