//! Upload card state, driven by one reducer per UI event.

use derive_more::{Display, From};
use uuid::Uuid;

use crate::analysis::{interpret, Verdict};
use crate::{ModelStatus, Prediction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From)]
pub struct ImageId(Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub id: ImageId,
    pub name: String,
    /// Preview source and classify payload.
    pub data_url: String,
}

impl SelectedImage {
    pub fn new(name: impl Into<String>, data_url: impl Into<String>) -> Self {
        Self {
            id: ImageId::new(),
            name: name.into(),
            data_url: data_url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ModelStatusChanged(ModelStatus),
    DragOver,
    DragLeave,
    ImageSelected(SelectedImage),
    ImageRejected(String),
    AnalyzeRequested,
    AnalysisCompleted(ImageId, Vec<Prediction>),
    AnalysisFailed(ImageId, String),
    Clear,
}

/// What the view has to do after an action was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Unchanged,
    Render,
    Classify(SelectedImage),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadState {
    pub image: Option<SelectedImage>,
    pub predictions: Vec<Prediction>,
    pub analyzing: bool,
    pub dragging: bool,
    pub model: ModelStatus,
    in_flight: Option<ImageId>,
}

impl UploadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: Action) -> Step {
        match action {
            Action::ModelStatusChanged(status) => self.set_model_status(status),
            Action::DragOver => self.set_dragging(true),
            Action::DragLeave => self.set_dragging(false),
            Action::ImageSelected(image) => {
                self.image = Some(image);
                self.predictions.clear();
                self.dragging = false;
                // An earlier request keeps `in_flight` so its result is dropped.
                self.analyzing = false;
                Step::Render
            }
            Action::ImageRejected(name) => {
                log::warn!("Skipping non-image file: {}", name);
                self.set_dragging(false)
            }
            Action::AnalyzeRequested => self.begin_analysis(),
            Action::AnalysisCompleted(id, predictions) => {
                let step = self.finish_analysis(id);
                if step == Step::Render && self.is_current(id) {
                    self.predictions = predictions;
                }
                step
            }
            Action::AnalysisFailed(id, error) => {
                log::error!("Analysis failed for image {}: {}", id, error);
                self.finish_analysis(id)
            }
            Action::Clear => {
                if self.image.is_none() && self.predictions.is_empty() {
                    return Step::Unchanged;
                }
                self.image = None;
                self.predictions.clear();
                self.analyzing = false;
                Step::Render
            }
        }
    }

    /// `None` until predictions for the current image have arrived.
    pub fn verdict(&self) -> Option<Verdict> {
        interpret(Some(self.predictions.as_slice()))
    }

    pub fn can_analyze(&self) -> bool {
        self.image.is_some() && self.model.is_ready() && !self.analyzing
    }

    /// The trigger stays disabled while loading, after a failed load and
    /// while a request is in flight.
    pub fn analyze_disabled(&self) -> bool {
        !self.can_analyze()
    }

    fn set_model_status(&mut self, status: ModelStatus) -> Step {
        // A failed load is final.
        if self.model.error().is_some() || self.model == status {
            return Step::Unchanged;
        }
        self.model = status;
        Step::Render
    }

    fn set_dragging(&mut self, dragging: bool) -> Step {
        if self.dragging == dragging {
            return Step::Unchanged;
        }
        self.dragging = dragging;
        Step::Render
    }

    fn begin_analysis(&mut self) -> Step {
        if !self.can_analyze() {
            return Step::Unchanged;
        }
        match &self.image {
            Some(image) => {
                self.analyzing = true;
                self.in_flight = Some(image.id);
                Step::Classify(image.clone())
            }
            None => Step::Unchanged,
        }
    }

    fn finish_analysis(&mut self, id: ImageId) -> Step {
        if self.in_flight != Some(id) {
            return Step::Unchanged;
        }
        self.in_flight = None;
        self.analyzing = false;
        Step::Render
    }

    fn is_current(&self, id: ImageId) -> bool {
        self.image.as_ref().is_some_and(|image| image.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RiskStatus;

    fn ready_state() -> UploadState {
        let mut state = UploadState::new();
        state.apply(Action::ModelStatusChanged(ModelStatus::Ready {
            model: "mobilenet_v2".into(),
        }));
        state
    }

    fn image(name: &str) -> SelectedImage {
        SelectedImage::new(name, "data:image/png;base64,AAAA")
    }

    #[test]
    fn analyze_blocked_until_model_ready() {
        let mut state = UploadState::new();
        state.apply(Action::ImageSelected(image("mole.jpg")));
        assert!(state.analyze_disabled());
        assert_eq!(state.apply(Action::AnalyzeRequested), Step::Unchanged);
        assert!(!state.analyzing);

        state.apply(Action::ModelStatusChanged(ModelStatus::Ready {
            model: "mobilenet_v2".into(),
        }));
        assert!(matches!(state.apply(Action::AnalyzeRequested), Step::Classify(_)));
    }

    #[test]
    fn analyze_needs_an_image() {
        let mut state = ready_state();
        assert!(!state.can_analyze());
        assert_eq!(state.apply(Action::AnalyzeRequested), Step::Unchanged);
    }

    #[test]
    fn one_analysis_at_a_time() {
        let mut state = ready_state();
        state.apply(Action::ImageSelected(image("mole.jpg")));
        assert!(matches!(state.apply(Action::AnalyzeRequested), Step::Classify(_)));
        assert!(state.analyzing);
        assert!(state.analyze_disabled());
        assert_eq!(state.apply(Action::AnalyzeRequested), Step::Unchanged);
    }

    #[test]
    fn completed_analysis_produces_verdict() {
        let mut state = ready_state();
        let selected = image("mole.jpg");
        let id = selected.id;
        state.apply(Action::ImageSelected(selected));
        assert_eq!(state.verdict(), None);

        state.apply(Action::AnalyzeRequested);
        let step = state.apply(Action::AnalysisCompleted(
            id,
            vec![Prediction::new("band aid", 0.6), Prediction::new("lotion", 0.2)],
        ));
        assert_eq!(step, Step::Render);
        assert!(!state.analyzing);

        let verdict = state.verdict().unwrap();
        assert_eq!(verdict.score, 60);
        assert_eq!(verdict.status, RiskStatus::High);
    }

    #[test]
    fn failure_keeps_image_and_shows_nothing() {
        let mut state = ready_state();
        let selected = image("mole.jpg");
        let id = selected.id;
        state.apply(Action::ImageSelected(selected.clone()));
        state.apply(Action::AnalyzeRequested);

        assert_eq!(
            state.apply(Action::AnalysisFailed(id, "tensor shape mismatch".into())),
            Step::Render
        );
        assert!(!state.analyzing);
        assert_eq!(state.image, Some(selected));
        assert_eq!(state.verdict(), None);
        assert!(state.can_analyze());
    }

    #[test]
    fn new_image_discards_predictions() {
        let mut state = ready_state();
        let first = image("first.jpg");
        let first_id = first.id;
        state.apply(Action::ImageSelected(first));
        state.apply(Action::AnalyzeRequested);
        state.apply(Action::AnalysisCompleted(first_id, vec![Prediction::new("a", 0.3)]));
        assert!(state.verdict().is_some());

        state.apply(Action::ImageSelected(image("second.jpg")));
        assert!(state.predictions.is_empty());
        assert_eq!(state.verdict(), None);
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut state = ready_state();
        let first = image("first.jpg");
        let first_id = first.id;
        state.apply(Action::ImageSelected(first));
        state.apply(Action::AnalyzeRequested);

        state.apply(Action::ImageSelected(image("second.jpg")));
        assert!(!state.analyzing);
        assert!(state.can_analyze());

        state.apply(Action::AnalysisCompleted(first_id, vec![Prediction::new("a", 0.7)]));
        assert!(!state.analyzing);
        assert!(state.predictions.is_empty());
        assert_eq!(state.image.as_ref().unwrap().name, "second.jpg");
    }

    #[test]
    fn clear_during_analysis_frees_the_next_image() {
        let mut state = ready_state();
        let first = image("first.jpg");
        let first_id = first.id;
        state.apply(Action::ImageSelected(first));
        state.apply(Action::AnalyzeRequested);
        assert!(state.analyzing);

        assert_eq!(state.apply(Action::Clear), Step::Render);
        assert!(!state.analyzing);

        let second = image("second.jpg");
        let second_id = second.id;
        state.apply(Action::ImageSelected(second));
        assert!(!state.analyzing);
        assert!(!state.analyze_disabled());

        // The first request finishes late: no spinner change, no verdict.
        state.apply(Action::AnalysisCompleted(first_id, vec![Prediction::new("a", 0.7)]));
        assert!(state.predictions.is_empty());
        assert_eq!(state.verdict(), None);

        assert!(matches!(state.apply(Action::AnalyzeRequested), Step::Classify(ref img) if img.id == second_id));
        assert!(state.analyzing);
        state.apply(Action::AnalysisFailed(first_id, "late failure".into()));
        assert!(state.analyzing);

        state.apply(Action::AnalysisCompleted(second_id, vec![Prediction::new("b", 0.3)]));
        assert!(!state.analyzing);
        assert_eq!(state.verdict().unwrap().score, 30);
    }

    #[test]
    fn unreachable_status_endpoint_keeps_loading() {
        let mut state = UploadState::new();
        state.apply(Action::ImageSelected(image("mole.jpg")));

        assert_eq!(
            state.apply(Action::ModelStatusChanged(ModelStatus::Loading)),
            Step::Unchanged
        );
        assert!(state.model.is_loading());
        assert!(state.model.error().is_none());
        assert!(state.analyze_disabled());

        assert_eq!(
            state.apply(Action::ModelStatusChanged(ModelStatus::Ready {
                model: "mobilenet_v2".into(),
            })),
            Step::Render
        );
        assert!(state.can_analyze());
    }

    #[test]
    fn result_for_unknown_request_is_ignored() {
        let mut state = ready_state();
        state.apply(Action::ImageSelected(image("mole.jpg")));
        let step = state.apply(Action::AnalysisCompleted(
            ImageId::new(),
            vec![Prediction::new("a", 0.7)],
        ));
        assert_eq!(step, Step::Unchanged);
        assert!(state.predictions.is_empty());
    }

    #[test]
    fn clear_resets_selection() {
        let mut state = ready_state();
        let selected = image("mole.jpg");
        let id = selected.id;
        state.apply(Action::ImageSelected(selected));
        state.apply(Action::AnalyzeRequested);
        state.apply(Action::AnalysisCompleted(id, vec![Prediction::new("a", 0.3)]));

        assert_eq!(state.apply(Action::Clear), Step::Render);
        assert!(state.image.is_none());
        assert_eq!(state.verdict(), None);
        assert_eq!(state.apply(Action::Clear), Step::Unchanged);
    }

    #[test]
    fn load_failure_is_final() {
        let mut state = UploadState::new();
        let failed = ModelStatus::Failed {
            error: "Failed to load AI model".into(),
        };
        assert_eq!(state.apply(Action::ModelStatusChanged(failed.clone())), Step::Render);
        assert_eq!(
            state.apply(Action::ModelStatusChanged(ModelStatus::Ready {
                model: "mobilenet_v2".into()
            })),
            Step::Unchanged
        );
        assert_eq!(state.model, failed);
        state.apply(Action::ImageSelected(image("mole.jpg")));
        assert!(state.analyze_disabled());
        assert_eq!(state.apply(Action::AnalyzeRequested), Step::Unchanged);
    }

    #[test]
    fn drag_flag_tracks_zone() {
        let mut state = UploadState::new();
        assert_eq!(state.apply(Action::DragOver), Step::Render);
        assert_eq!(state.apply(Action::DragOver), Step::Unchanged);
        assert_eq!(state.apply(Action::DragLeave), Step::Render);

        state.apply(Action::DragOver);
        state.apply(Action::ImageRejected("notes.txt".into()));
        assert!(!state.dragging);

        state.apply(Action::DragOver);
        state.apply(Action::ImageSelected(image("mole.jpg")));
        assert!(!state.dragging);
    }
}
