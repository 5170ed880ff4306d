use std::time::Instant;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_MS: u128 = 80;

/// Spinner glyph for the time elapsed since `start`.
pub fn spinner_frame(start: Option<Instant>) -> &'static str {
    let elapsed = start.map_or(0, |s| s.elapsed().as_millis());
    frame_at(elapsed)
}

fn frame_at(elapsed_ms: u128) -> &'static str {
    let idx = (elapsed_ms / FRAME_MS) as usize % FRAMES.len();
    FRAMES[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_cycle() {
        assert_eq!(frame_at(0), "⠋");
        assert_eq!(frame_at(FRAME_MS), "⠙");
        assert_eq!(frame_at(FRAME_MS * 10), "⠋");
    }
}
