/// True when `position` has reached the finish line and the round is still
/// open. The session wins at most once because it sets `is_game_over` right after.
pub fn on_position_updated(position: f32, finish_line: f32, is_game_over: bool) -> bool {
    !is_game_over && position >= finish_line
}

/// How far along the track `position` is, in `0.0..=1.0`.
pub fn progress_fraction(position: f32, start: f32, finish: f32) -> f32 {
    let length = finish - start;
    if length <= 0.0 || !position.is_finite() {
        return 0.0;
    }
    ((position - start) / length).clamp(0.0, 1.0)
}
