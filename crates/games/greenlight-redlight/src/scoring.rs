/// Points awarded for crossing the finish line.
pub const WIN_POINTS: i32 = 10;
/// Maximum bonus for finishing with time to spare (timed rounds only).
pub const MAX_TIME_BONUS: i32 = 5;
/// Maximum consolation points for progress made before elimination.
pub const MAX_PROGRESS_POINTS: i32 = 5;

/// Calculate the player's score for a round.
///
/// `progress` and `time_left` are fractions in `0.0..=1.0`.
pub fn calculate_score(won: bool, progress: f32, time_left: f32) -> i32 {
    if won {
        let bonus = (time_left.clamp(0.0, 1.0) * MAX_TIME_BONUS as f32).round() as i32;
        return WIN_POINTS + bonus;
    }
    (progress.clamp(0.0, 1.0) * MAX_PROGRESS_POINTS as f32).floor() as i32
}
