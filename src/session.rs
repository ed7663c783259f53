//! Screen flow and input dispatch
//!
//! The DOM layer asks this module what to show and what a key press means;
//! nothing here touches the browser.

use crate::profile::PlayerProfile;
use crate::sim::GamePhase;

/// Which overlay is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Name / position form
    Registration,
    /// Story and controls, waiting for the first start
    Legend,
    Playing,
    GameOver,
    Leaderboard,
}

/// What a key press should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Let the browser handle it (typing into a field)
    PassThrough,
    StartGame,
    Jump,
    ToggleIdle,
    ToggleMute,
    /// Swallow the key (no page scroll) but do nothing
    Consume,
    /// Not ours; leave the browser default alone
    Ignore,
}

/// Where keyboard focus currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    TextInput,
    Page,
}

/// Screen transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    Registered,
    Start,
    RoundEnded,
    ViewLeaderboard,
    CloseLeaderboard,
    Restart,
}

impl Screen {
    /// First screen for a (possibly missing) stored profile
    pub fn initial(profile: Option<&PlayerProfile>) -> Self {
        if profile.is_some() {
            Screen::Legend
        } else {
            Screen::Registration
        }
    }

    /// Next screen, or `None` when the event does not apply here
    pub fn next(self, event: ScreenEvent) -> Option<Screen> {
        use Screen::*;
        use ScreenEvent::*;
        match (self, event) {
            (Registration, Registered) => Some(Legend),
            (Legend, Start) => Some(Playing),
            (Playing, RoundEnded) => Some(GameOver),
            (GameOver, ViewLeaderboard) => Some(Leaderboard),
            (Leaderboard, CloseLeaderboard) => Some(GameOver),
            (GameOver | Leaderboard, Restart) => Some(Playing),
            _ => None,
        }
    }

    /// DOM element id of the overlay for this screen, if any
    pub fn element_id(&self) -> Option<&'static str> {
        match self {
            Screen::Registration => Some("registrationScreen"),
            Screen::Legend => Some("legendScreen"),
            Screen::Playing => None,
            Screen::GameOver => Some("gameOver"),
            Screen::Leaderboard => Some("leaderboardScreen"),
        }
    }
}

/// Overlay ids the driver toggles
pub const OVERLAY_IDS: [&str; 4] = ["registrationScreen", "legendScreen", "gameOver", "leaderboardScreen"];

/// Map a key press to an action. Space is the only gameplay key; while a text
/// field has focus it belongs to the field, otherwise it never scrolls the page.
pub fn dispatch_key(key: &str, focus: Focus, screen: Screen, phase: GamePhase) -> KeyAction {
    if focus == Focus::TextInput {
        return KeyAction::PassThrough;
    }
    match key {
        " " | "Space" => {
            if phase == GamePhase::Running {
                KeyAction::Jump
            } else if screen == Screen::Legend {
                KeyAction::StartGame
            } else {
                KeyAction::Consume
            }
        }
        "i" | "I" | "KeyI" => KeyAction::ToggleIdle,
        "m" | "M" | "KeyM" => KeyAction::ToggleMute,
        _ => KeyAction::Ignore,
    }
}

/// Score line on the HUD
pub fn hud_text(score: u64) -> String {
    format!("SCORE: {}", score)
}

/// Verdict shown under the final score
pub fn score_comment(score: u64) -> &'static str {
    match score {
        0 => "😢 SHAME ON THE FAMILY!",
        1..=99 => "🥖 NOT EVEN ENOUGH FOR BREAD...",
        100..=199 => "🍞 ENOUGH FOR A LOAF!",
        200..=349 => "💰 SAVING UP FOR SOMETHING?",
        350..=499 => "📱 THAT'S AN IPHONE!",
        500..=699 => "👔 THE BOSS IS PLEASED!",
        700..=999 => "🌟 EXCELLENT WORK!",
        _ => "🏆 OFFICE LEGEND!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_screen() {
        assert_eq!(Screen::initial(None), Screen::Registration);
        let p = PlayerProfile::register("A", "B").unwrap();
        assert_eq!(Screen::initial(Some(&p)), Screen::Legend);
    }

    #[test]
    fn test_full_flow() {
        let s = Screen::Registration;
        let s = s.next(ScreenEvent::Registered).unwrap();
        assert_eq!(s, Screen::Legend);
        let s = s.next(ScreenEvent::Start).unwrap();
        assert_eq!(s, Screen::Playing);
        let s = s.next(ScreenEvent::RoundEnded).unwrap();
        assert_eq!(s, Screen::GameOver);
        let s = s.next(ScreenEvent::ViewLeaderboard).unwrap();
        assert_eq!(s, Screen::Leaderboard);
        let s = s.next(ScreenEvent::CloseLeaderboard).unwrap();
        assert_eq!(s, Screen::GameOver);
        assert_eq!(s.next(ScreenEvent::Restart), Some(Screen::Playing));
        assert_eq!(
            Screen::Leaderboard.next(ScreenEvent::Restart),
            Some(Screen::Playing)
        );
    }

    #[test]
    fn test_invalid_transitions() {
        assert_eq!(Screen::Registration.next(ScreenEvent::Start), None);
        assert_eq!(Screen::Playing.next(ScreenEvent::Restart), None);
        assert_eq!(Screen::Legend.next(ScreenEvent::RoundEnded), None);
    }

    #[test]
    fn test_space_in_text_field_passes_through() {
        for phase in [GamePhase::NotStarted, GamePhase::Running, GamePhase::GameOver] {
            assert_eq!(
                dispatch_key(" ", Focus::TextInput, Screen::Registration, phase),
                KeyAction::PassThrough
            );
        }
    }

    #[test]
    fn test_space_dispatch() {
        assert_eq!(
            dispatch_key(" ", Focus::Page, Screen::Legend, GamePhase::NotStarted),
            KeyAction::StartGame
        );
        assert_eq!(
            dispatch_key(" ", Focus::Page, Screen::Playing, GamePhase::Running),
            KeyAction::Jump
        );
        assert_eq!(
            dispatch_key(" ", Focus::Page, Screen::GameOver, GamePhase::GameOver),
            KeyAction::Consume
        );
        assert_eq!(
            dispatch_key(" ", Focus::Page, Screen::Leaderboard, GamePhase::GameOver),
            KeyAction::Consume
        );
        assert_eq!(
            dispatch_key("Enter", Focus::Page, Screen::Playing, GamePhase::Running),
            KeyAction::Ignore
        );
        assert_eq!(
            dispatch_key("m", Focus::Page, Screen::GameOver, GamePhase::GameOver),
            KeyAction::ToggleMute
        );
        assert_eq!(
            dispatch_key("m", Focus::TextInput, Screen::Registration, GamePhase::NotStarted),
            KeyAction::PassThrough
        );
    }

    #[test]
    fn test_score_comments() {
        assert_eq!(score_comment(0), "😢 SHAME ON THE FAMILY!");
        assert_eq!(score_comment(90), "🥖 NOT EVEN ENOUGH FOR BREAD...");
        assert_eq!(score_comment(100), "🍞 ENOUGH FOR A LOAF!");
        assert_eq!(score_comment(999), "🌟 EXCELLENT WORK!");
        assert_eq!(score_comment(1000), "🏆 OFFICE LEGEND!");
    }

    #[test]
    fn test_overlay_ids_match_screens() {
        for screen in [
            Screen::Registration,
            Screen::Legend,
            Screen::GameOver,
            Screen::Leaderboard,
        ] {
            assert!(OVERLAY_IDS.contains(&screen.element_id().unwrap()));
        }
        assert_eq!(hud_text(40), "SCORE: 40");
    }
}
