use std::io::Write;

use tempfile::NamedTempFile;

/// Two leaves of four vertices joined at the root.
pub const CHERRY: &str = "\
# tree
R A
R B
# probabilities
R 0.5
A 0.6
B 0.6
# sizes
A 4
B 4
";

/// Three leaves under two merge levels.
pub const NESTED: &str = "\
# tree
R X
R C
X A
X B
# probabilities
R 0.4
X 0.5
A 0.3
B 0.35
C 0.25
# sizes
A 20
B 30
C 25
";

#[must_use]
pub fn dendrogram_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary file must be created");
    file.write_all(contents.as_bytes())
        .expect("temporary file must be writable");
    file
}
