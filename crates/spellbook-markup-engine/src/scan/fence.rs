use super::window::floor_boundary;

/// The fence marker opening and closing a code block.
pub const FENCE: &str = "```";

/// True if a trimmed line opens or closes a fence.
pub fn is_fence_line(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

/// Whether `position` sits inside a fenced code block.
///
/// Every line before the cursor that starts with a fence toggles the state.
/// An opening fence with no fence marker anywhere after the cursor counts as
/// unterminated and reports `false`.
pub fn inside_fence(text: &str, position: usize) -> bool {
    let position = floor_boundary(text, position);
    let (before, after) = text.split_at(position);

    let inside = before
        .split('\n')
        .filter(|line| is_fence_line(line))
        .count()
        % 2
        == 1;

    inside && after.contains(FENCE)
}
