//! Typewriter text effect for the hero line.

use std::time::{Duration, Instant};

/// Delay between `start` (or `resume`) and the first keystroke.
pub const START_DELAY: Duration = Duration::from_millis(2000);
/// Delay between typed characters.
pub const TYPE_DELAY: Duration = Duration::from_millis(100);
/// Delay between deleted characters.
pub const DELETE_DELAY: Duration = Duration::from_millis(50);
/// Pause once a word is fully typed.
pub const HOLD_DELAY: Duration = Duration::from_millis(2000);
/// Pause once a word is fully deleted.
pub const NEXT_WORD_DELAY: Duration = Duration::from_millis(500);

/// Lifecycle of a [`Typewriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    Running,
    Paused,
    Disposed,
}

/// Types a list of words one character at a time, deletes them, and moves on.
///
/// Time is passed in explicitly; the owner calls [`Typewriter::poll`] from its
/// loop and may sleep until [`Typewriter::next_deadline`].
#[derive(Debug)]
pub struct Typewriter {
    words: Vec<String>,
    word_index: usize,
    /// Characters of the current word currently shown.
    char_index: usize,
    deleting: bool,
    text: String,
    phase: Phase,
    deadline: Option<Instant>,
}

impl Typewriter {
    /// Create a typewriter over `words`. Empty words are skipped.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(Into::into)
            .filter(|w: &String| !w.is_empty())
            .collect();

        Self {
            words,
            word_index: 0,
            char_index: 0,
            deleting: false,
            text: String::new(),
            phase: Phase::Created,
            deadline: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Text currently shown.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// When the next keystroke is due, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Begin typing after [`START_DELAY`]. Only valid from `Created`.
    pub fn start(&mut self, now: Instant) {
        if self.phase != Phase::Created {
            return;
        }
        self.phase = Phase::Running;
        self.schedule(now, START_DELAY);
    }

    /// Drop the pending keystroke. Progress through the word is kept.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            self.deadline = None;
        }
    }

    /// Continue after a pause, waiting [`START_DELAY`] first.
    pub fn resume(&mut self, now: Instant) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            self.schedule(now, START_DELAY);
        }
    }

    /// Stop for good.
    pub fn dispose(&mut self) {
        self.phase = Phase::Disposed;
        self.deadline = None;
    }

    /// Perform the pending keystroke if it is due. Returns whether the text
    /// changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if self.phase == Phase::Running && deadline <= now => {
                let delay = self.keystroke();
                self.schedule(now, delay);
                true
            }
            _ => false,
        }
    }

    fn schedule(&mut self, now: Instant, delay: Duration) {
        // No words, nothing to type
        self.deadline = if self.words.is_empty() {
            None
        } else {
            Some(now + delay)
        };
    }

    /// Type or delete one character and return the delay until the next one.
    fn keystroke(&mut self) -> Duration {
        let word = &self.words[self.word_index];
        let len = word.chars().count();

        if self.deleting {
            self.char_index = self.char_index.saturating_sub(1);
            self.text = word.chars().take(self.char_index).collect();

            if self.char_index == 0 {
                self.deleting = false;
                self.word_index = (self.word_index + 1) % self.words.len();
                NEXT_WORD_DELAY
            } else {
                DELETE_DELAY
            }
        } else {
            self.char_index = (self.char_index + 1).min(len);
            self.text = word.chars().take(self.char_index).collect();

            if self.char_index == len {
                self.deleting = true;
                HOLD_DELAY
            } else {
                TYPE_DELAY
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Poll exactly at the scheduled deadline and return the new text.
    fn tick(tw: &mut Typewriter) -> String {
        let deadline = tw.next_deadline().expect("a keystroke should be scheduled");
        assert!(tw.poll(deadline));
        tw.text().to_string()
    }

    #[test]
    fn test_waits_for_start_delay() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new(["ab"]);
        assert!(!tw.poll(t0));

        tw.start(t0);
        assert_eq!(tw.phase(), Phase::Running);
        assert_eq!(tw.next_deadline(), Some(t0 + START_DELAY));
        assert!(!tw.poll(t0 + START_DELAY - Duration::from_millis(1)));
        assert!(tw.poll(t0 + START_DELAY));
        assert_eq!(tw.text(), "a");
    }

    #[test]
    fn test_full_cycle_with_delays() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new(["ab", "c"]);
        tw.start(t0);

        let mut now = t0 + START_DELAY;
        let mut step = |tw: &mut Typewriter, expected_delay: Duration| {
            assert!(tw.poll(now));
            assert_eq!(tw.next_deadline(), Some(now + expected_delay));
            now += expected_delay;
            tw.text().to_string()
        };

        assert_eq!(step(&mut tw, TYPE_DELAY), "a");
        assert_eq!(step(&mut tw, HOLD_DELAY), "ab");
        assert_eq!(step(&mut tw, DELETE_DELAY), "a");
        assert_eq!(step(&mut tw, NEXT_WORD_DELAY), "");
        assert_eq!(step(&mut tw, HOLD_DELAY), "c");
        assert_eq!(step(&mut tw, NEXT_WORD_DELAY), "");
        // Wraps back to the first word
        assert_eq!(step(&mut tw, TYPE_DELAY), "a");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let mut tw = Typewriter::new(["né"]);
        tw.start(Instant::now());
        assert_eq!(tick(&mut tw), "n");
        assert_eq!(tick(&mut tw), "né");
        assert_eq!(tick(&mut tw), "n");
    }

    #[test]
    fn test_pause_and_resume_keep_progress() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new(["abc"]);
        tw.start(t0);
        tick(&mut tw);
        tick(&mut tw);
        assert_eq!(tw.text(), "ab");

        tw.pause();
        assert_eq!(tw.phase(), Phase::Paused);
        assert_eq!(tw.next_deadline(), None);
        assert!(!tw.poll(t0 + Duration::from_secs(60)));

        let later = t0 + Duration::from_secs(120);
        tw.resume(later);
        assert_eq!(tw.next_deadline(), Some(later + START_DELAY));
        assert_eq!(tick(&mut tw), "abc");
    }

    #[test]
    fn test_dispose_is_final() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new(["abc"]);
        tw.start(t0);
        tw.dispose();
        assert_eq!(tw.phase(), Phase::Disposed);
        assert!(!tw.poll(t0 + Duration::from_secs(10)));

        tw.start(t0);
        tw.resume(t0);
        assert_eq!(tw.phase(), Phase::Disposed);
        assert_eq!(tw.next_deadline(), None);
    }

    #[test]
    fn test_start_twice_does_not_reschedule() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new(["abc"]);
        tw.start(t0);
        tw.start(t0 + Duration::from_secs(5));
        assert_eq!(tw.next_deadline(), Some(t0 + START_DELAY));
    }

    #[test]
    fn test_empty_words_are_inert() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new(["", ""]);
        tw.start(t0);
        assert_eq!(tw.next_deadline(), None);
        assert!(!tw.poll(t0 + Duration::from_secs(10)));
        assert_eq!(tw.text(), "");

        let mut mixed = Typewriter::new(["", "x"]);
        mixed.start(t0);
        assert_eq!(tick(&mut mixed), "x");
    }
}
