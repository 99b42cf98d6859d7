//! Link line assembly.

use std::path::{Path, PathBuf};

use crate::analyze::{Linker, join_command};

/// Link driver used when no analyzed file suggested one.
pub const FALLBACK_LINKER: &str = "cc";

/// Pick the highest-ranked linker, falling back to [`FALLBACK_LINKER`].
pub fn select_linker<I>(candidates: I) -> Linker
where
    I: IntoIterator<Item = Linker>,
{
    let chosen = candidates.into_iter().fold(Linker::default(), Linker::max);
    if chosen.is_ranked() {
        chosen
    } else {
        Linker::for_c(FALLBACK_LINKER)
    }
}

/// Whether an output matches a `link_order` entry.
///
/// Entries name either the object (`crt0.s.o`) or its source (`crt0.s`).
fn matches_entry(output: &Path, entry: &str) -> bool {
    let Some(name) = output.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name == entry || name.strip_suffix(".o") == Some(entry)
}

/// Sort outputs lexicographically, then pull `order` entries to the front in
/// the order given.
///
/// Duplicates are dropped. A build rejects colliding objects before it gets
/// here; a clean run may list the same object twice.
pub fn sort_outputs(mut outputs: Vec<PathBuf>, order: &[String]) -> Vec<PathBuf> {
    outputs.sort();
    outputs.dedup();

    let mut front = Vec::with_capacity(outputs.len());
    for entry in order {
        if let Some(index) = outputs.iter().position(|o| matches_entry(o, entry)) {
            front.push(outputs.remove(index));
        }
    }
    front.extend(outputs);
    front
}

/// `<linker> <ldflags> -o <target> <outputs...>`
pub fn link_command(linker: &Linker, ldflags: &str, target: &Path, outputs: &[PathBuf]) -> String {
    let target = target.to_string_lossy();
    let mut parts = vec![linker.command().to_string(), ldflags.to_string()];
    parts.push("-o".to_string());
    parts.push(target.into_owned());
    parts.extend(outputs.iter().map(|o| o.to_string_lossy().into_owned()));
    join_command(&parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_select_linker_by_language() {
        let asm_c = select_linker([Linker::for_asm("as"), Linker::for_c("gcc")]);
        assert_eq!(asm_c.command(), "gcc");

        let all = select_linker([
            Linker::for_asm("as"),
            Linker::for_cpp("g++"),
            Linker::for_c("gcc"),
        ]);
        assert_eq!(all.command(), "g++");
    }

    #[test]
    fn test_select_linker_override_wins() {
        let chosen = select_linker([Linker::for_cpp("g++"), Linker::for_override("ld.lld")]);
        assert_eq!(chosen.command(), "ld.lld");
    }

    #[test]
    fn test_select_linker_fallback() {
        assert_eq!(select_linker(Vec::<Linker>::new()).command(), FALLBACK_LINKER);
        assert_eq!(select_linker([Linker::for_c(" ")]).command(), FALLBACK_LINKER);
    }

    #[test]
    fn test_sort_outputs_is_lexicographic() {
        let sorted = sort_outputs(paths(&["w/b.c.o", "w/a.c.o", "w/c.s.o"]), &[]);
        assert_eq!(sorted, paths(&["w/a.c.o", "w/b.c.o", "w/c.s.o"]));
    }

    #[test]
    fn test_sort_outputs_pulls_link_order_to_front() {
        let order = vec!["crt0.s".to_string(), "util.c.o".to_string(), "missing.c".to_string()];
        let sorted = sort_outputs(
            paths(&["w/main.c.o", "w/util.c.o", "w/crt0.s.o", "w/a.c.o"]),
            &order,
        );
        assert_eq!(sorted, paths(&["w/crt0.s.o", "w/util.c.o", "w/a.c.o", "w/main.c.o"]));
    }

    #[test]
    fn test_link_command() {
        let command = link_command(
            &Linker::for_c("cc"),
            "",
            Path::new("a.out"),
            &paths(&["a.c.o", "b.c.o"]),
        );
        assert_eq!(command, "cc -o a.out a.c.o b.c.o");

        let command = link_command(
            &Linker::for_cpp("c++"),
            "-lm -pthread",
            Path::new("bin/app"),
            &paths(&["x.cpp.o"]),
        );
        assert_eq!(command, "c++ -lm -pthread -o bin/app x.cpp.o");
    }
}
