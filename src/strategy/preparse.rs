//! Content-level normalization applied before line parsing.

/// Blank out C-style `/* ... */` comments, delimiters included.
///
/// Every byte of the comment except newlines becomes a space, so line
/// numbering and byte offsets are preserved exactly. An unterminated
/// comment blanks through to the end of the content.
pub fn strip_block_comments(content: &str) -> String {
    let mut bytes = content.as_bytes().to_vec();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            bytes[i] = b' ';
            bytes[i + 1] = b' ';
            let mut j = i + 2;
            loop {
                if j >= bytes.len() {
                    i = j;
                    break;
                }
                if bytes[j] == b'*' && bytes.get(j + 1) == Some(&b'/') {
                    bytes[j] = b' ';
                    bytes[j + 1] = b' ';
                    i = j + 2;
                    break;
                }
                if bytes[j] != b'\n' {
                    bytes[j] = b' ';
                }
                j += 1;
            }
        } else {
            i += 1;
        }
    }
    // Only ASCII bytes were replaced with ASCII spaces.
    String::from_utf8(bytes).unwrap_or_else(|_| content.to_string())
}

#[cfg(test)]
#[path = "preparse_test.rs"]
mod tests;
