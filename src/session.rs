//! Application state for one running session.
//!
//! A [`Session`] owns the request form, the displayed result set, the history
//! of past result sets (newest first) and the optional open mask editor. All
//! state lives in memory and is lost when the session is dropped.
//!
//! Submissions are split into `begin_*` and `complete_*` halves around the
//! network call. `begin_*` validates locally and hands out a ticket; only one
//! ticket is outstanding at a time. `complete_*` publishes the outcome if the
//! ticket is still current and discards it otherwise.

use rand::Rng;

use crate::{
    config::UploadLimits,
    error::{MockupError, Result},
    gemini::{ImageSynthesizer, TextRewriter},
    generation,
    mask::MaskEditor,
    models::{
        GenerationRequest, ImageBuffer, IndustryCategory, MockupDraft, ResultSet, ResultSetId,
        DEFAULT_EXAMPLE_COUNT,
    },
};

/// Identifies one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// One image of one result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditTarget {
    pub set_id: ResultSetId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Submit,
    Edit(EditTarget),
}

impl PendingKind {
    fn is_edit(&self) -> bool {
        matches!(self, PendingKind::Edit(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    ticket: Ticket,
    kind: PendingKind,
}

/// A validated request waiting to be sent.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub ticket: Ticket,
    pub request: GenerationRequest,
}

#[derive(Debug)]
struct OpenEditor {
    target: EditTarget,
    editor: MaskEditor,
}

#[derive(Debug)]
pub struct Session {
    pub draft: MockupDraft,
    limits: UploadLimits,
    displayed: Option<ResultSet>,
    history: Vec<ResultSet>,
    pending: Option<Pending>,
    next_ticket: u64,
    last_error: Option<MockupError>,
    examples: Vec<&'static str>,
    editor: Option<OpenEditor>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(UploadLimits::default())
    }
}

impl Session {
    pub fn new(limits: UploadLimits) -> Self {
        let mut session = Self {
            draft: MockupDraft::default(),
            limits,
            displayed: None,
            history: Vec::new(),
            pending: None,
            next_ticket: 0,
            last_error: None,
            examples: Vec::new(),
            editor: None,
        };
        session.refresh_examples(&mut rand::thread_rng());
        session
    }

    pub fn upload_limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// True while a generation or edit is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_busy() && self.draft.is_complete()
    }

    pub fn displayed(&self) -> Option<&ResultSet> {
        self.displayed.as_ref()
    }

    /// Past result sets, most recent first.
    pub fn history(&self) -> &[ResultSet] {
        &self.history
    }

    pub fn last_error(&self) -> Option<&MockupError> {
        self.last_error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn examples(&self) -> &[&'static str] {
        &self.examples
    }

    pub fn refresh_examples<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.examples = self
            .draft
            .category
            .sample_examples(DEFAULT_EXAMPLE_COUNT, rng);
    }

    pub fn set_category(&mut self, category: IndustryCategory) {
        self.draft.category = category;
        self.refresh_examples(&mut rand::thread_rng());
    }

    /// Copies an example prompt into the description field.
    pub fn use_example(&mut self, index: usize) -> bool {
        match self.examples.get(index) {
            Some(example) => {
                self.draft.description = example.to_string();
                true
            }
            None => false,
        }
    }

    /// Resets the description and uploads. Category, ratio and count are kept.
    pub fn clear_form(&mut self) {
        self.draft.description.clear();
        self.draft.logo = None;
        self.draft.base_image = None;
        self.last_error = None;
        self.refresh_examples(&mut rand::thread_rng());
    }

    fn fail<T>(&mut self, err: MockupError) -> Result<T> {
        self.last_error = Some(err.clone());
        Err(err)
    }

    fn issue_ticket(&mut self, kind: PendingKind) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.pending = Some(Pending { ticket, kind });
        ticket
    }

    /// Takes the pending slot if `ticket` is the current one. A current ticket
    /// of the other kind (edit vs. submit) is rejected and the slot kept.
    fn settle(&mut self, ticket: Ticket, expect_edit: bool) -> Result<Option<PendingKind>> {
        match self.pending {
            Some(pending) if pending.ticket == ticket => {
                if pending.kind.is_edit() != expect_edit {
                    return Err(MockupError::RequestRejected(format!(
                        "Ticket {:?} belongs to {} request",
                        ticket,
                        if pending.kind.is_edit() { "an edit" } else { "a generation" }
                    )));
                }
                self.pending = None;
                Ok(Some(pending.kind))
            }
            _ => {
                log::warn!("Discarding result for stale request {:?}", ticket);
                Ok(None)
            }
        }
    }

    /// Validates the form and marks a request as in flight.
    pub fn begin_submit(&mut self) -> Result<Dispatch> {
        if self.is_busy() {
            return Err(MockupError::RequestRejected(
                "A generation is already in progress".into(),
            ));
        }
        let request = match self.draft.build() {
            Ok(request) => request,
            Err(e) => return self.fail(e),
        };
        self.last_error = None;
        let ticket = self.issue_ticket(PendingKind::Submit);
        log::debug!("Submitting {} request as {:?}", request.mode.name(), ticket);
        Ok(Dispatch { ticket, request })
    }

    /// Publishes a finished batch. Returns `Ok(None)` when the ticket is stale.
    pub fn complete_submit(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<ImageBuffer>>,
    ) -> Result<Option<ResultSetId>> {
        if self.settle(ticket, false)?.is_none() {
            return Ok(None);
        }
        let images = match outcome {
            Ok(images) if images.is_empty() => {
                return self.fail(MockupError::EmptyGenerationResult(
                    "No images were generated".into(),
                ))
            }
            Ok(images) => images,
            Err(e) => return self.fail(e),
        };

        let set = ResultSet::new(images);
        let id = set.id();
        log::info!("Published result set {} with {} image(s)", id, set.len());
        self.history.insert(0, set.clone());
        self.displayed = Some(set);
        Ok(Some(id))
    }

    /// Gives up on the outstanding request. Its result is discarded on arrival.
    pub fn abandon_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::info!("Abandoned request {:?}", pending.ticket);
        }
    }

    /// Runs a full submission against `synth`.
    pub async fn submit<S>(&mut self, synth: &S) -> Result<ResultSetId>
    where
        S: ImageSynthesizer + ?Sized,
    {
        let dispatch = self.begin_submit()?;
        let outcome = generation::generate_batch(synth, &dispatch.request, &self.limits).await;
        self.complete_submit(dispatch.ticket, outcome)?
            .ok_or_else(|| MockupError::RequestRejected("The request was abandoned".into()))
    }

    pub fn select_history_entry(&mut self, id: ResultSetId) -> Result<()> {
        let set = self
            .history
            .iter()
            .find(|set| set.id() == id)
            .cloned()
            .ok_or_else(|| MockupError::RequestRejected(format!("No result set {}", id)))?;
        self.displayed = Some(set);
        Ok(())
    }

    fn find_image(&self, target: EditTarget) -> Option<&ImageBuffer> {
        self.displayed
            .iter()
            .chain(self.history.iter())
            .find(|set| set.id() == target.set_id)
            .and_then(|set| set.get(target.index))
    }

    /// Replaces one image in the displayed set and in its history entry.
    pub fn apply_edit(&mut self, set_id: ResultSetId, index: usize, image: ImageBuffer) -> Result<()> {
        let target = EditTarget { set_id, index };
        if self.find_image(target).is_none() {
            return Err(MockupError::RequestRejected(format!(
                "Image {} of result set {} does not exist",
                index, set_id
            )));
        }

        if let Some(displayed) = self.displayed.as_mut().filter(|set| set.id() == set_id) {
            displayed.replace(index, image.clone())?;
        }
        if let Some(entry) = self.history.iter_mut().find(|set| set.id() == set_id) {
            entry.replace(index, image)?;
        }
        Ok(())
    }

    pub fn open_editor(&mut self, set_id: ResultSetId, index: usize) -> Result<&mut MaskEditor> {
        let target = EditTarget { set_id, index };
        let image = self.find_image(target).ok_or_else(|| {
            MockupError::RequestRejected(format!(
                "Image {} of result set {} does not exist",
                index, set_id
            ))
        })?;
        let editor = MaskEditor::open(image)?;
        let open = self.editor.insert(OpenEditor { target, editor });
        Ok(&mut open.editor)
    }

    pub fn editor(&self) -> Option<&MaskEditor> {
        self.editor.as_ref().map(|open| &open.editor)
    }

    pub fn editor_mut(&mut self) -> Option<&mut MaskEditor> {
        self.editor.as_mut().map(|open| &mut open.editor)
    }

    pub fn edit_target(&self) -> Option<EditTarget> {
        self.editor.as_ref().map(|open| open.target)
    }

    /// Discards the editor and its mask.
    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Builds the inpaint request from the open editor's cut-out.
    pub fn begin_edit(&mut self, instruction: &str) -> Result<Dispatch> {
        if self.is_busy() {
            return Err(MockupError::RequestRejected(
                "A generation is already in progress".into(),
            ));
        }
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return self.fail(MockupError::RequestRejected(
                "Describe the change to make".into(),
            ));
        }
        let Some(open) = self.editor.as_ref() else {
            return self.fail(MockupError::RequestRejected("No image is being edited".into()));
        };
        let target = open.target;
        let ratio = open.editor.aspect_ratio();
        let cutout = match open.editor.compose_cutout() {
            Ok(cutout) => cutout,
            Err(e) => return self.fail(e),
        };

        self.last_error = None;
        let request = GenerationRequest::inpaint(cutout, instruction, ratio);
        let ticket = self.issue_ticket(PendingKind::Edit(target));
        Ok(Dispatch { ticket, request })
    }

    /// Applies an inpaint result and closes the editor. Failures keep the editor open.
    pub fn complete_edit(&mut self, ticket: Ticket, outcome: Result<ImageBuffer>) -> Result<bool> {
        let Some(PendingKind::Edit(target)) = self.settle(ticket, true)? else {
            return Ok(false);
        };
        let image = match outcome {
            Ok(image) => image,
            Err(e) => return self.fail(e),
        };
        if let Err(e) = self.apply_edit(target.set_id, target.index, image) {
            return self.fail(e);
        }
        if self.edit_target() == Some(target) {
            self.close_editor();
        }
        log::info!("Applied edit to image {} of {}", target.index, target.set_id);
        Ok(true)
    }

    pub async fn submit_edit<S>(&mut self, synth: &S, instruction: &str) -> Result<()>
    where
        S: ImageSynthesizer + ?Sized,
    {
        let dispatch = self.begin_edit(instruction)?;
        let outcome = generation::generate_one(synth, &dispatch.request, &self.limits).await;
        if self.complete_edit(dispatch.ticket, outcome)? {
            Ok(())
        } else {
            Err(MockupError::RequestRejected("The edit was abandoned".into()))
        }
    }

    /// Replaces the description with a cleaned-up version. Blank text is left alone.
    pub async fn rewrite_description<R>(&mut self, rewriter: &R) -> Result<()>
    where
        R: TextRewriter + ?Sized,
    {
        let text = self.draft.description.trim().to_string();
        if text.is_empty() {
            return Ok(());
        }
        match rewriter.rewrite(&text).await {
            Ok(rewritten) => {
                self.draft.description = rewritten;
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::png_buffer;
    use crate::generation::tests::{result_image, ScriptedSynthesizer};
    use crate::mask::Point;
    use crate::models::{AspectRatio, GenerationMode, InputMode, OutputCount};
    use async_trait::async_trait;
    use rand::{rngs::StdRng, SeedableRng};

    fn ready_session(count: OutputCount) -> Session {
        let mut session = Session::default();
        session.set_category(IndustryCategory::TechSaas);
        session.draft.description = "a laptop sticker on a desk".into();
        session.draft.logo = Some(png_buffer(8, 8, [0, 0, 255, 255]));
        session.draft.aspect_ratio = AspectRatio::SQUARE;
        session.draft.output_count = count;
        session
    }

    /// Result images the mask editor can decode.
    fn decodable(count: usize) -> ScriptedSynthesizer {
        ScriptedSynthesizer::new(
            (0..count)
                .map(|i| Ok(png_buffer(6, 4, [i as u8 * 40, 10, 10, 255])))
                .collect(),
        )
    }

    struct Uppercase;

    #[async_trait]
    impl TextRewriter for Uppercase {
        async fn rewrite(&self, text: &str) -> Result<String> {
            Ok(text.to_uppercase())
        }
    }

    struct Broken;

    #[async_trait]
    impl TextRewriter for Broken {
        async fn rewrite(&self, _text: &str) -> Result<String> {
            Err(MockupError::RateLimited("quota".into()))
        }
    }

    #[tokio::test]
    async fn test_submit_publishes_result_set() {
        let mut session = ready_session(OutputCount::Two);
        let synth = ScriptedSynthesizer::succeeding(2);
        let id = session.submit(&synth).await.unwrap();

        assert_eq!(synth.call_count(), 2);
        assert_eq!(session.history().len(), 1);
        let shown = session.displayed().unwrap();
        assert_eq!(shown.id(), id);
        assert_eq!(shown.len(), 2);
        assert!(!session.is_busy());

        let prompts = synth.prompts.lock().unwrap();
        assert!(prompts[0].text.contains("1080:1080"));
        assert!(prompts[0].text.contains(IndustryCategory::TechSaas.style_guide()));
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let mut session = ready_session(OutputCount::One);
        let first = session.submit(&ScriptedSynthesizer::succeeding(1)).await.unwrap();
        let second = session.submit(&ScriptedSynthesizer::succeeding(1)).await.unwrap();
        let ids: Vec<_> = session.history().iter().map(|set| set.id()).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn test_missing_logo_is_rejected_locally() {
        let mut session = ready_session(OutputCount::One);
        session.draft.logo = None;
        let synth = ScriptedSynthesizer::succeeding(1);

        let err = session.submit(&synth).await.unwrap_err();
        assert!(matches!(err, MockupError::RequestRejected(_)));
        assert_eq!(synth.call_count(), 0);
        assert!(session.history().is_empty());
        assert!(!session.is_busy());
        assert_eq!(session.last_error(), Some(&err));
    }

    #[tokio::test]
    async fn test_image_mode_requires_base() {
        let mut session = ready_session(OutputCount::One);
        session.draft.input_mode = InputMode::Image;
        assert!(!session.can_submit());
        session.draft.base_image = Some(png_buffer(4, 4, [1, 1, 1, 255]));
        assert!(session.can_submit());
        let dispatch = session.begin_submit().unwrap();
        assert!(matches!(dispatch.request.mode, GenerationMode::BaseImageReplace { .. }));
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_state_unchanged() {
        let mut session = ready_session(OutputCount::One);
        let kept = session.submit(&ScriptedSynthesizer::succeeding(1)).await.unwrap();

        session.draft.output_count = OutputCount::Two;
        let synth = ScriptedSynthesizer::new(vec![
            Ok(result_image(7)),
            Err(MockupError::GenerationFailed("backend exploded".into())),
        ]);
        let err = session.submit(&synth).await.unwrap_err();

        assert_eq!(err, MockupError::GenerationFailed("backend exploded".into()));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.displayed().unwrap().id(), kept);
        assert_eq!(session.last_error(), Some(&err));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_only_one_request_in_flight() {
        let mut session = ready_session(OutputCount::One);
        let dispatch = session.begin_submit().unwrap();
        assert!(session.is_busy());
        assert!(!session.can_submit());
        assert!(matches!(session.begin_submit(), Err(MockupError::RequestRejected(_))));

        session
            .complete_submit(dispatch.ticket, Ok(vec![result_image(1)]))
            .unwrap();
        assert!(session.begin_submit().is_ok());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut session = ready_session(OutputCount::One);
        let stale = session.begin_submit().unwrap();
        session.abandon_pending();
        assert!(!session.is_busy());

        let current = session.begin_submit().unwrap();
        assert_eq!(
            session.complete_submit(stale.ticket, Ok(vec![result_image(1)])).unwrap(),
            None
        );
        assert!(session.history().is_empty());
        assert!(session.is_busy());

        let id = session
            .complete_submit(current.ticket, Ok(vec![result_image(2)]))
            .unwrap();
        assert!(id.is_some());
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_ticket_cannot_publish_a_result_set() {
        let mut session = ready_session(OutputCount::One);
        let set_id = session.submit(&decodable(1)).await.unwrap();
        session.open_editor(set_id, 0).unwrap();
        let edit = session.begin_edit("make it glossy").unwrap();

        let err = session
            .complete_submit(edit.ticket, Ok(vec![result_image(5)]))
            .unwrap_err();
        assert!(matches!(err, MockupError::RequestRejected(_)));
        assert_eq!(session.history().len(), 1);
        assert!(session.is_busy());

        assert!(session.complete_edit(edit.ticket, Ok(result_image(6))).unwrap());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.displayed().unwrap().get(0), Some(&result_image(6)));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_submit_ticket_survives_wrong_completion() {
        let mut session = ready_session(OutputCount::One);
        let dispatch = session.begin_submit().unwrap();

        assert!(session.complete_edit(dispatch.ticket, Ok(result_image(1))).is_err());
        assert!(session.is_busy());

        let id = session
            .complete_submit(dispatch.ticket, Ok(vec![result_image(2)]))
            .unwrap();
        assert!(id.is_some());
        assert_eq!(session.history().len(), 1);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_edit_then_select_shows_edited_image() {
        let mut session = ready_session(OutputCount::Two);
        let set_id = session.submit(&decodable(2)).await.unwrap();
        let untouched = session.displayed().unwrap().get(0).cloned().unwrap();

        {
            let editor = session.open_editor(set_id, 1).unwrap();
            editor.pointer_down(Point::new(2.0, 2.0));
            editor.pointer_up();
        }
        let edited = result_image(99);
        let synth = ScriptedSynthesizer::new(vec![Ok(edited.clone())]);
        session.submit_edit(&synth, "add a shadow").await.unwrap();
        assert!(session.editor().is_none());

        let inpaint = &synth.prompts.lock().unwrap()[0];
        assert!(inpaint.text.contains("add a shadow"));
        assert!(inpaint.text.contains("6:4"));
        assert_eq!(inpaint.attachments.len(), 1);

        // A newer submission takes over the display.
        session.submit(&ScriptedSynthesizer::succeeding(2)).await.unwrap();
        assert_ne!(session.displayed().unwrap().id(), set_id);

        session.select_history_entry(set_id).unwrap();
        let shown = session.displayed().unwrap();
        assert_eq!(shown.get(1), Some(&edited));
        assert_eq!(shown.get(0), Some(&untouched));
        assert_eq!(session.history()[1].get(1), Some(&edited));
    }

    #[tokio::test]
    async fn test_failed_edit_keeps_editor_and_image() {
        let mut session = ready_session(OutputCount::One);
        let set_id = session.submit(&decodable(1)).await.unwrap();
        let original = session.displayed().unwrap().get(0).cloned().unwrap();
        session.open_editor(set_id, 0).unwrap();

        let synth = ScriptedSynthesizer::new(vec![Err(MockupError::RateLimited("slow down".into()))]);
        let err = session.submit_edit(&synth, "make it blue").await.unwrap_err();
        assert!(err.is_retryable());
        assert!(session.editor().is_some());
        assert_eq!(session.displayed().unwrap().get(0), Some(&original));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_edit_requires_instruction_and_editor() {
        let mut session = ready_session(OutputCount::One);
        assert!(session.begin_edit("fix it").is_err());

        let set_id = session.submit(&decodable(1)).await.unwrap();
        session.open_editor(set_id, 0).unwrap();
        assert!(session.begin_edit("   ").is_err());
        assert!(!session.is_busy());
        assert!(session.open_editor(set_id, 5).is_err());
    }

    #[test]
    fn test_apply_edit_without_history_entry_updates_display() {
        let mut session = Session::default();
        let set = ResultSet::new(vec![result_image(1)]);
        let id = set.id();
        session.displayed = Some(set);

        session.apply_edit(id, 0, result_image(2)).unwrap();
        assert_eq!(session.displayed().unwrap().get(0), Some(&result_image(2)));
        assert!(session.history().is_empty());
        assert!(session.apply_edit(id, 3, result_image(3)).is_err());
    }

    #[tokio::test]
    async fn test_rewrite_description() {
        let mut session = Session::default();
        session.rewrite_description(&Uppercase).await.unwrap();
        assert_eq!(session.draft.description, "");

        session.draft.description = "  a mug ".into();
        session.rewrite_description(&Uppercase).await.unwrap();
        assert_eq!(session.draft.description, "A MUG");

        assert!(session.rewrite_description(&Broken).await.is_err());
        assert_eq!(session.draft.description, "A MUG");
        assert!(matches!(session.last_error(), Some(MockupError::RateLimited(_))));
    }

    #[test]
    fn test_examples_follow_category() {
        let mut session = Session::default();
        session.set_category(IndustryCategory::RealEstate);
        assert_eq!(session.examples().len(), DEFAULT_EXAMPLE_COUNT);
        let pool = IndustryCategory::RealEstate.example_prompts();
        assert!(session.examples().iter().all(|e| pool.contains(e)));

        session.refresh_examples(&mut StdRng::seed_from_u64(3));
        assert!(session.use_example(0));
        assert_eq!(session.draft.description, session.examples()[0]);
        assert!(!session.use_example(42));
    }

    #[test]
    fn test_clear_form_keeps_preferences() {
        let mut session = ready_session(OutputCount::Four);
        session.draft.base_image = Some(png_buffer(2, 2, [0, 0, 0, 255]));
        session.clear_form();
        assert!(session.draft.description.is_empty());
        assert!(session.draft.logo.is_none());
        assert!(session.draft.base_image.is_none());
        assert_eq!(session.draft.category, IndustryCategory::TechSaas);
        assert_eq!(session.draft.aspect_ratio, AspectRatio::SQUARE);
        assert_eq!(session.draft.output_count, OutputCount::Four);
    }
}
