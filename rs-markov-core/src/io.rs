use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Reads a whole file as a UTF-8 string.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Writes a string to a file, replacing any previous content.
pub(crate) fn write_file<P: AsRef<Path>>(filename: P, contents: &str) -> io::Result<()> {
	File::create(filename)?.write_all(contents.as_bytes())
}
