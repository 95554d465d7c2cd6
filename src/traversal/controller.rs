use crate::{error::{DeckError, Result},
            markup::MarkupSnapshot,
            rules::{Action, Diagnostic, RuleSet, StoppingRule, is_end, next_action},
            traversal::{CaptureSink, Presentation}};
use std::time::Duration;

/// Observable phase of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Capturing,
    Deciding,
    Navigating,
    Ended,
    Failed,
}

/// Mutable state of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalState {
    /// 1-based index of the slide on screen
    pub slide_index: usize,

    /// Latched once the stopping rule fires
    pub done: bool,

    pub last_action: Option<Action>,
}

impl Default for TraversalState {
    fn default() -> Self {
        Self { slide_index: 1, done: false, last_action: None }
    }
}

/// Run options fixed for the duration of a run
#[derive(Debug, Clone)]
pub struct TraversalOptions {
    /// Pause after each navigation so slide transitions can finish
    pub animation_delay: Duration,

    /// Stop after this many slides even if the stopping rule never fires
    pub max_slides: Option<usize>,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self { animation_delay: Duration::from_millis(300), max_slides: None }
    }
}

impl TraversalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the animation delay
    pub fn animation_delay(mut self, delay: Duration) -> Self {
        self.animation_delay = delay;
        self
    }

    /// Builder method: set the slide ceiling
    pub fn max_slides(mut self, max: usize) -> Self {
        self.max_slides = Some(max);
        self
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct TraversalReport {
    /// Slide indices in capture order
    pub captured: Vec<usize>,

    /// State at the end of the run
    pub state: TraversalState,

    /// Configuration diagnostics raised for this run
    pub diagnostics: Vec<Diagnostic>,

    /// The run hit `max_slides` before the stopping rule fired
    pub truncated: bool,
}

impl TraversalReport {
    pub fn slide_count(&self) -> usize {
        self.captured.len()
    }
}

enum Step {
    Start,
    Capturing,
    Deciding,
    Navigating(MarkupSnapshot),
    Ended,
}

impl Step {
    fn phase(&self) -> Phase {
        match self {
            Step::Start => Phase::Start,
            Step::Capturing => Phase::Capturing,
            Step::Deciding => Phase::Deciding,
            Step::Navigating(_) => Phase::Navigating,
            Step::Ended => Phase::Ended,
        }
    }
}

/// Drives capture and navigation for one deck
///
/// The first slide is always captured. After each capture a fresh snapshot
/// decides whether the deck has ended; if not, the next action is resolved,
/// sent, and the controller waits out the transition before capturing again.
/// Any fault from the presentation or the sink ends the run; nothing is retried.
pub struct TraversalController<P, C> {
    presentation: P,
    sink: C,
    rules: RuleSet,
    options: TraversalOptions,
    phase: Phase,
}

impl<P: Presentation, C: CaptureSink> TraversalController<P, C> {
    pub fn new(presentation: P, sink: C, rules: RuleSet, options: TraversalOptions) -> Self {
        Self { presentation, sink, rules, options, phase: Phase::Start }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Give back the presentation and sink
    pub fn into_parts(self) -> (P, C) {
        (self.presentation, self.sink)
    }

    /// Run the deck from the slide currently on screen to the end
    pub fn run(&mut self) -> Result<TraversalReport> {
        let mut state = TraversalState::default();
        let mut captured = Vec::new();
        let mut rule = StoppingRule::default();
        let mut truncated = false;
        let mut step = Step::Start;

        loop {
            self.phase = step.phase();

            step = match step {
                Step::Start => {
                    let snapshot = match self.snapshot() {
                        Ok(snapshot) => snapshot,
                        Err(e) => {
                            self.phase = Phase::Failed;
                            return Err(DeckError::ContentUnreachable(Box::new(e)));
                        }
                    };

                    rule = self.rules.stopping_rule(&snapshot);
                    log::debug!("Stopping rule for this run: {:?}", rule);

                    state.done = is_end(&snapshot, false, &rule);
                    Step::Capturing
                }
                Step::Capturing => {
                    if let Err(e) = self.sink.capture(state.slide_index) {
                        return Err(self.fail(state.slide_index, e));
                    }
                    log::info!("Captured slide {}", state.slide_index);
                    captured.push(state.slide_index);
                    Step::Deciding
                }
                Step::Deciding => {
                    let snapshot = match self.snapshot() {
                        Ok(snapshot) => snapshot,
                        Err(e) => return Err(self.fail(state.slide_index, e)),
                    };

                    state.done = is_end(&snapshot, state.done, &rule);

                    if state.done {
                        log::debug!("Slide {} is the last slide", state.slide_index);
                        Step::Ended
                    } else if self.options.max_slides.is_some_and(|max| state.slide_index >= max) {
                        log::warn!(
                            "Stopping after {} slides without reaching the end of the deck",
                            state.slide_index
                        );
                        truncated = true;
                        Step::Ended
                    } else {
                        Step::Navigating(snapshot)
                    }
                }
                Step::Navigating(snapshot) => {
                    let action = next_action(&snapshot, self.rules.navigation.as_ref());
                    log::debug!("Slide {}: sending {}", state.slide_index, action);

                    if let Err(e) = self.presentation.navigate(&action) {
                        return Err(self.fail(state.slide_index, e));
                    }

                    if !self.options.animation_delay.is_zero() {
                        std::thread::sleep(self.options.animation_delay);
                    }

                    state.last_action = Some(action);
                    state.slide_index += 1;
                    Step::Capturing
                }
                Step::Ended => {
                    return Ok(TraversalReport {
                        captured,
                        state,
                        diagnostics: self.rules.diagnostics.clone(),
                        truncated,
                    });
                }
            };
        }
    }

    fn snapshot(&mut self) -> Result<MarkupSnapshot> {
        self.presentation.markup().map(MarkupSnapshot::parse)
    }

    fn fail(&mut self, slide: usize, source: DeckError) -> DeckError {
        self.phase = Phase::Failed;
        log::debug!("Run failed at slide {}: {}", slide, source);
        DeckError::TraversalFailed { slide, source: Box::new(source) }
    }
}
