/// Indentation depth of one outline line.
///
/// Leading tabs win when the line starts with one; otherwise every two leading spaces count as
/// one level (`floor(spaces / 2)`, so 3 spaces is depth 1).
pub fn outline_depth(line: &str) -> usize {
    let tabs = line.bytes().take_while(|b| *b == b'\t').count();
    if tabs > 0 {
        return tabs;
    }
    line.bytes().take_while(|b| *b == b' ').count() / 2
}

pub(super) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
