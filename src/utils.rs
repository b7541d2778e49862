/// Length of `text` in UTF-16 code units, the unit LSP columns are measured in.
pub fn utf16_len(text: &str) -> u32 {
    text.chars().map(|c| c.len_utf16() as u32).sum()
}

/// Converts a byte offset within `line` into a UTF-16 column.
///
/// Offsets past the end clamp to the line length.
pub fn utf16_column(line: &str, byte_offset: usize) -> u32 {
    let end = byte_offset.min(line.len());
    utf16_len(&line[..end])
}

/// Converts a UTF-16 column back into a byte offset within `line`.
///
/// A column in the middle of a surrogate pair resolves to the start of that
/// character; columns past the end clamp to the line length.
pub fn byte_offset(line: &str, column: u32) -> usize {
    let mut units = 0u32;
    for (offset, c) in line.char_indices() {
        let width = c.len_utf16() as u32;
        if units + width > column {
            return offset;
        }
        units += width;
    }
    line.len()
}

/// Byte offsets at which each `\n`-separated line of `source` starts.
pub fn line_start_offsets(source: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(source.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}
