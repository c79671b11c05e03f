//! Relative module specifier resolution.
//!
//! Only `./` and `../` specifiers are resolved. Everything else is left to
//! ambient `declare module` blocks inside the checker.

use rustc_hash::FxHashMap;
use tyck_ast::types::FileId;

/// File names of a program, keyed by their normalized form.
#[derive(Debug, Default)]
pub struct ModuleResolver {
    files: FxHashMap<String, FileId>,
}

impl ModuleResolver {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let files = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| (normalize(name), FileId(index as u32)))
            .collect();
        Self { files }
    }

    /// Resolve `specifier` as written in `importer`, trying `<spec>.ts`,
    /// `<spec>.d.ts` and then `<spec>/index.ts`.
    pub fn resolve(&self, importer: &str, specifier: &str) -> Option<FileId> {
        if !is_relative(specifier) {
            return None;
        }
        let base = normalize(&format!("{}/{}", directory_of(importer), specifier));
        if base.ends_with(".ts") {
            if let Some(&file) = self.files.get(&base) {
                return Some(file);
            }
        }
        [format!("{base}.ts"), format!("{base}.d.ts"), format!("{base}/index.ts")]
            .iter()
            .find_map(|candidate| self.files.get(candidate).copied())
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".."
}

fn directory_of(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    match path.rfind(['/', '\\']) {
        Some(0) => "/",
        Some(index) => &path[..index],
        None => ".",
    }
}

/// Collapse `.` and `..` segments and use `/` separators. Leading `..`
/// segments that cannot be collapsed are kept.
pub(crate) fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("./src/./a.ts"), "src/a.ts");
        assert_eq!(normalize("src/lib/../a.ts"), "src/a.ts");
        assert_eq!(normalize("../x/a.ts"), "../x/a.ts");
        assert_eq!(normalize("/root/./p/../a.ts"), "/root/a.ts");
        assert_eq!(normalize("src\\a.ts"), "src/a.ts");
    }

    #[test]
    fn test_resolution_order() {
        let resolver = ModuleResolver::new(["src/a.ts", "src/m.d.ts", "src/m.ts", "src/util/index.ts"]);
        assert_eq!(resolver.resolve("src/a.ts", "./m"), Some(FileId(2)));
        assert_eq!(resolver.resolve("src/a.ts", "./util"), Some(FileId(3)));
        assert_eq!(resolver.resolve("src/util/index.ts", "../a"), Some(FileId(0)));
        assert_eq!(resolver.resolve("src/util/index.ts", "../a.ts"), Some(FileId(0)));
    }

    #[test]
    fn test_declaration_file_fallback() {
        let resolver = ModuleResolver::new(["a.ts", "types.d.ts"]);
        assert_eq!(resolver.resolve("a.ts", "./types"), Some(FileId(1)));
    }

    #[test]
    fn test_unresolved_specifiers() {
        let resolver = ModuleResolver::new(["a.ts"]);
        assert_eq!(resolver.resolve("a.ts", "./missing"), None);
        assert_eq!(resolver.resolve("a.ts", "lodash"), None);
    }
}
