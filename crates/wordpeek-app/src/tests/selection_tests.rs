use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kanal::AsyncSender;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use wordpeek_config::popup::PopupConfig;
use wordpeek_core::{
    DefinitionEntry, EnabledState, FailureKind, LookupError, LookupResult, LookupToken,
};
use wordpeek_dictionary::DefinitionClient;
use wordpeek_types::{HostEvent, Point, SelectionEvent, Size};
use wordpeek_ui::view::{DEF_CLASS, ERROR_CLASS, EXAMPLE_CLASS, PHONETIC_CLASS, POS_CLASS};
use wordpeek_ui::{MemorySurface, PopupView};

use crate::selection::SelectionController;
use crate::status::{ControllerState, ControllerStatus};

struct Script {
    result: LookupResult,
    gate: Option<Arc<Notify>>,
    honour_cancel: bool,
    panic: bool,
}

impl Script {
    fn ready(result: LookupResult) -> Self {
        Self {
            result,
            gate: None,
            honour_cancel: true,
            panic: false,
        }
    }

    /// Held until `gate` is notified
    fn gated(result: LookupResult, gate: &Arc<Notify>, honour_cancel: bool) -> Self {
        Self {
            result,
            gate: Some(gate.clone()),
            honour_cancel,
            panic: false,
        }
    }
}

/// Dictionary double with per-word canned results
#[derive(Default)]
struct ScriptedClient {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
}

impl ScriptedClient {
    fn script(&self, word: &str, script: Script) {
        self.scripts.lock().unwrap().insert(word.to_string(), script);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DefinitionClient for ScriptedClient {
    async fn lookup(&self, token: &LookupToken, cancel: CancellationToken) -> LookupResult {
        self.calls.lock().unwrap().push(token.to_string());

        let (result, gate, honour_cancel, panic) = {
            let scripts = self.scripts.lock().unwrap();
            match scripts.get(token.as_str()) {
                Some(s) => (s.result.clone(), s.gate.clone(), s.honour_cancel, s.panic),
                None => (LookupResult::NotFound, None, true, false),
            }
        };
        if panic {
            panic!("scripted lookup panic");
        }

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let result = match gate {
            Some(gate) if honour_cancel => {
                tokio::select! {
                    _ = cancel.cancelled() => LookupResult::Cancelled,
                    _ = gate.notified() => result,
                }
            }
            Some(gate) => {
                gate.notified().await;
                result
            }
            None => result,
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

struct Harness {
    surface: Arc<MemorySurface>,
    client: Arc<ScriptedClient>,
    enabled: EnabledState,
    host_tx: AsyncSender<HostEvent>,
    status: watch::Receiver<ControllerStatus>,
    shutdown: CancellationToken,
    task: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn new() -> Self {
        let surface = Arc::new(
            MemorySurface::new(Size::new(1000.0, 800.0))
                .with_measured_size(Size::new(300.0, 180.0)),
        );
        let client = Arc::new(ScriptedClient::default());
        let enabled = EnabledState::default();

        let view = PopupView::new(surface.clone(), PopupConfig::default());
        let controller = SelectionController::new(
            view,
            client.clone(),
            enabled.subscribe(),
            Duration::from_millis(10),
        );
        let status = controller.subscribe();

        let (host_tx, host_rx) = kanal::bounded_async(64);
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(controller.run(host_rx, shutdown.clone()));

        Self {
            surface,
            client,
            enabled,
            host_tx,
            status,
            shutdown,
            task,
        }
    }

    async fn send(&self, event: HostEvent) {
        self.host_tx.send(event).await.unwrap();
    }

    async fn select(&self, text: &str, x: f64, y: f64) {
        self.send(HostEvent::SelectionEnd(SelectionEvent::new(text, x, y)))
            .await;
    }

    /// Let debounce timers fire and ready lookups complete
    async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    fn state(&self) -> ControllerState {
        self.status.borrow().state
    }

    fn text_of(&self, class: &str) -> String {
        let node = self.surface.single().expect("exactly one popup");
        node.tree
            .find(class)
            .map(|e| e.text_content())
            .unwrap_or_default()
    }
}

fn hello_entry() -> DefinitionEntry {
    DefinitionEntry {
        phonetic: "/həˈləʊ/".to_string(),
        audio_url: Some("https://audio.example/hello.mp3".to_string()),
        part_of_speech: "exclamation".to_string(),
        definition: "used as a greeting".to_string(),
        example: Some("hello there, Katie!".to_string()),
    }
}

fn entry(definition: &str) -> DefinitionEntry {
    DefinitionEntry {
        part_of_speech: "noun".to_string(),
        definition: definition.to_string(),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn successful_lookup_renders_next_to_selection() {
    let h = Harness::new();
    h.client
        .script("hello", Script::ready(LookupResult::Success(hello_entry())));

    h.select("Hello", 100.0, 100.0).await;
    h.settle().await;

    let node = h.surface.single().unwrap();
    assert_eq!(node.at, Point::new(115.0, 115.0));
    assert_eq!(h.text_of("wordpeek-word"), "hello");
    assert_eq!(h.text_of(PHONETIC_CLASS).trim_end_matches("🔊"), "/həˈləʊ/");
    assert_eq!(h.text_of(POS_CLASS), "exclamation");
    assert_eq!(h.text_of(DEF_CLASS), "used as a greeting");
    assert_eq!(h.text_of(EXAMPLE_CLASS), "\"hello there, Katie!\"");
    assert_eq!(h.client.calls(), vec!["hello"]);

    let status = h.status.borrow().clone();
    assert_eq!(status.state, ControllerState::Settled);
    assert_eq!(status.word.as_deref(), Some("hello"));
    assert_eq!(status.lookups_started, 1);
}

#[tokio::test(start_paused = true)]
async fn popup_flips_away_from_the_right_edge() {
    let h = Harness::new();
    h.client
        .script("edge", Script::ready(LookupResult::Success(entry("a border"))));

    h.select("edge", 950.0, 50.0).await;
    h.settle().await;

    assert_eq!(h.surface.single().unwrap().at, Point::new(635.0, 65.0));
}

#[tokio::test(start_paused = true)]
async fn loading_state_shows_placeholders() {
    let h = Harness::new();
    let gate = Arc::new(Notify::new());
    h.client.script(
        "slow",
        Script::gated(LookupResult::Success(entry("not fast")), &gate, true),
    );

    h.select("slow", 100.0, 100.0).await;
    h.settle().await;

    assert_eq!(h.state(), ControllerState::Loading);
    assert_eq!(h.text_of(PHONETIC_CLASS), "Loading...");
    assert_eq!(h.text_of(DEF_CLASS), "Fetching definition...");

    gate.notify_one();
    h.settle().await;
    assert_eq!(h.state(), ControllerState::Settled);
    assert_eq!(h.text_of(DEF_CLASS), "not fast");
}

#[tokio::test(start_paused = true)]
async fn rejected_selection_opens_nothing() {
    let h = Harness::new();

    for text in ["   ", "...!!", "a", "42"] {
        h.select(text, 100.0, 100.0).await;
        h.settle().await;
    }

    assert_eq!(h.surface.mounted_count(), 0);
    assert!(h.client.calls().is_empty());
    assert_eq!(h.state(), ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn collapsed_selection_closes_popup() {
    let h = Harness::new();
    h.client
        .script("hello", Script::ready(LookupResult::Success(hello_entry())));

    h.select("hello", 100.0, 100.0).await;
    h.settle().await;
    assert_eq!(h.surface.mounted_count(), 1);

    h.select("", 600.0, 600.0).await;
    h.settle().await;

    assert_eq!(h.surface.mounted_count(), 0);
    assert_eq!(h.surface.live_audio_count(), 0);
    assert_eq!(h.state(), ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn newer_selection_supersedes_late_result() {
    let h = Harness::new();
    let gate = Arc::new(Notify::new());
    // ignores cancellation so its result still arrives after supersession
    h.client.script(
        "first",
        Script::gated(LookupResult::Success(entry("stale")), &gate, false),
    );
    h.client
        .script("second", Script::ready(LookupResult::Success(entry("fresh"))));

    h.select("first", 100.0, 100.0).await;
    h.settle().await;
    assert_eq!(h.state(), ControllerState::Loading);

    h.select("second", 600.0, 400.0).await;
    h.settle().await;
    assert_eq!(h.text_of(DEF_CLASS), "fresh");
    let mutations = h.surface.mutation_count();

    gate.notify_one();
    h.settle().await;

    assert_eq!(h.surface.mounted_count(), 1);
    assert_eq!(h.text_of(DEF_CLASS), "fresh");
    assert_eq!(h.surface.mutation_count(), mutations);
    assert_eq!(h.status.borrow().word.as_deref(), Some("second"));
    assert_eq!(h.client.calls(), vec!["first", "second"]);
}

#[tokio::test(start_paused = true)]
async fn supersession_cancels_previous_request() {
    let h = Harness::new();
    let first_gate = Arc::new(Notify::new());
    let second_gate = Arc::new(Notify::new());
    h.client.script(
        "first",
        Script::gated(LookupResult::Success(entry("one")), &first_gate, true),
    );
    h.client.script(
        "second",
        Script::gated(LookupResult::Success(entry("two")), &second_gate, true),
    );

    h.select("first", 100.0, 100.0).await;
    h.settle().await;
    assert_eq!(h.client.in_flight(), 1);

    h.select("second", 600.0, 400.0).await;
    h.settle().await;

    assert_eq!(h.client.in_flight(), 1);
    assert_eq!(h.surface.mounted_count(), 1);
    assert_eq!(h.state(), ControllerState::Loading);
    assert_eq!(h.status.borrow().word.as_deref(), Some("second"));
}

#[tokio::test(start_paused = true)]
async fn escape_while_loading_closes_for_good() {
    let h = Harness::new();
    let gate = Arc::new(Notify::new());
    h.client.script(
        "slow",
        Script::gated(LookupResult::Success(entry("late")), &gate, false),
    );

    h.select("slow", 100.0, 100.0).await;
    h.settle().await;
    assert_eq!(h.surface.mounted_count(), 1);

    h.send(HostEvent::KeyDown {
        key: "Escape".to_string(),
    })
    .await;
    h.settle().await;
    assert_eq!(h.surface.mounted_count(), 0);
    assert_eq!(h.state(), ControllerState::Idle);
    let mutations = h.surface.mutation_count();

    gate.notify_one();
    h.settle().await;

    assert_eq!(h.surface.mounted_count(), 0);
    assert_eq!(h.surface.mutation_count(), mutations);
    assert_eq!(h.state(), ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn other_keys_are_ignored() {
    let h = Harness::new();
    h.client
        .script("hello", Script::ready(LookupResult::Success(hello_entry())));

    h.select("hello", 100.0, 100.0).await;
    h.settle().await;
    h.send(HostEvent::KeyDown {
        key: "Enter".to_string(),
    })
    .await;
    h.settle().await;

    assert_eq!(h.surface.mounted_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn failures_show_their_messages() {
    let cases = [
        (LookupResult::NotFound, FailureKind::NotFound),
        (
            LookupResult::NetworkError(LookupError::Transport("connection refused".into())),
            FailureKind::Connectivity,
        ),
        (
            LookupResult::NetworkError(LookupError::Status(503)),
            FailureKind::Connectivity,
        ),
        (
            LookupResult::NetworkError(LookupError::Malformed("empty array".into())),
            FailureKind::Other,
        ),
    ];

    for (result, kind) in cases {
        let h = Harness::new();
        h.client.script("word", Script::ready(result));

        h.select("word", 100.0, 100.0).await;
        h.settle().await;

        assert_eq!(h.text_of(DEF_CLASS), kind.message());
        assert_eq!(h.text_of(PHONETIC_CLASS), "");
        let node = h.surface.single().unwrap();
        assert!(node.tree.find(DEF_CLASS).unwrap().has_class(ERROR_CLASS));
        assert_eq!(h.state(), ControllerState::Settled);
    }
}

#[tokio::test(start_paused = true)]
async fn panicking_lookup_shows_generic_message() {
    let h = Harness::new();
    h.client.script(
        "boom",
        Script {
            panic: true,
            ..Script::ready(LookupResult::NotFound)
        },
    );

    h.select("boom", 100.0, 100.0).await;
    h.settle().await;

    assert_eq!(h.text_of(DEF_CLASS), "No definition found 😕");
    assert_eq!(h.state(), ControllerState::Settled);
}

#[tokio::test(start_paused = true)]
async fn disabling_tears_down_and_enabling_does_not_resurrect() {
    let h = Harness::new();
    h.client
        .script("hello", Script::ready(LookupResult::Success(hello_entry())));

    h.select("hello", 100.0, 100.0).await;
    h.settle().await;
    assert_eq!(h.state(), ControllerState::Settled);

    h.enabled.set(false);
    h.settle().await;
    assert_eq!(h.surface.mounted_count(), 0);
    assert_eq!(h.surface.live_audio_count(), 0);
    assert_eq!(h.state(), ControllerState::Idle);

    h.enabled.set(true);
    h.settle().await;
    assert_eq!(h.surface.mounted_count(), 0);
    assert_eq!(h.state(), ControllerState::Idle);
    assert_eq!(h.client.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn disabled_before_debounce_fires_means_no_popup() {
    let h = Harness::new();
    h.client
        .script("hello", Script::ready(LookupResult::Success(hello_entry())));

    h.select("hello", 100.0, 100.0).await;
    h.enabled.set(false);
    h.settle().await;

    assert_eq!(h.surface.mounted_count(), 0);
    assert!(h.client.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn selections_while_disabled_are_dropped() {
    let h = Harness::new();
    h.enabled.set(false);
    h.settle().await;

    h.select("hello", 100.0, 100.0).await;
    h.settle().await;

    assert_eq!(h.surface.mounted_count(), 0);
    assert!(h.client.calls().is_empty());
    assert_eq!(h.state(), ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn rapid_selections_collapse_into_one_lookup() {
    let h = Harness::new();

    h.select("alpha", 100.0, 100.0).await;
    h.select("beta", 100.0, 100.0).await;
    h.select("gamma", 100.0, 100.0).await;
    h.settle().await;

    assert_eq!(h.client.calls(), vec!["gamma"]);
    assert_eq!(h.surface.mounted_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn selection_inside_popup_is_ignored() {
    let h = Harness::new();
    h.client
        .script("hello", Script::ready(LookupResult::Success(hello_entry())));

    h.select("hello", 100.0, 100.0).await;
    h.settle().await;

    // popup spans (115, 115) to (415, 295)
    h.select("greeting", 200.0, 200.0).await;
    h.settle().await;

    assert_eq!(h.client.calls(), vec!["hello"]);
    assert_eq!(h.text_of("wordpeek-word"), "hello");
}

#[tokio::test(start_paused = true)]
async fn same_word_elsewhere_keeps_the_popup() {
    let h = Harness::new();
    h.client
        .script("hello", Script::ready(LookupResult::Success(hello_entry())));

    h.select("hello", 100.0, 100.0).await;
    h.settle().await;
    h.select("Hello!", 700.0, 600.0).await;
    h.settle().await;

    assert_eq!(h.client.calls(), vec!["hello"]);
    assert_eq!(h.surface.mounted_count(), 1);
    assert_eq!(h.state(), ControllerState::Settled);
}

#[tokio::test(start_paused = true)]
async fn pointer_down_outside_dismisses() {
    let h = Harness::new();
    h.client
        .script("hello", Script::ready(LookupResult::Success(hello_entry())));

    h.select("hello", 100.0, 100.0).await;
    h.settle().await;

    h.send(HostEvent::PointerDown { x: 300.0, y: 200.0 }).await;
    h.settle().await;
    assert_eq!(h.surface.mounted_count(), 1);

    h.send(HostEvent::PointerDown { x: 900.0, y: 700.0 }).await;
    h.settle().await;
    assert_eq!(h.surface.mounted_count(), 0);
    assert_eq!(h.state(), ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn close_navigation_and_hide_dismiss() {
    let dismissals = [
        HostEvent::CloseClicked,
        HostEvent::Navigation,
        HostEvent::VisibilityChanged { hidden: true },
    ];

    for event in dismissals {
        let h = Harness::new();
        h.client
            .script("hello", Script::ready(LookupResult::Success(hello_entry())));

        h.select("hello", 100.0, 100.0).await;
        h.settle().await;

        h.send(HostEvent::VisibilityChanged { hidden: false }).await;
        h.settle().await;
        assert_eq!(h.surface.mounted_count(), 1);

        h.send(event.clone()).await;
        h.settle().await;
        assert_eq!(h.surface.mounted_count(), 0, "{event:?} should dismiss");
        assert_eq!(h.state(), ControllerState::Idle);
    }
}

#[tokio::test(start_paused = true)]
async fn audio_click_plays_pronunciation() {
    let h = Harness::new();
    h.client
        .script("hello", Script::ready(LookupResult::Success(hello_entry())));

    h.select("hello", 100.0, 100.0).await;
    h.settle().await;
    assert_eq!(h.surface.live_audio_count(), 1);

    h.send(HostEvent::AudioClicked).await;
    h.settle().await;
    assert_eq!(h.surface.played(), vec!["https://audio.example/hello.mp3"]);

    h.send(HostEvent::CloseClicked).await;
    h.settle().await;
    assert_eq!(h.surface.live_audio_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn vanished_context_drops_result_quietly() {
    let h = Harness::new();
    let gate = Arc::new(Notify::new());
    h.client.script(
        "slow",
        Script::gated(LookupResult::Success(entry("gone")), &gate, false),
    );

    h.select("slow", 100.0, 100.0).await;
    h.settle().await;
    let mutations = h.surface.mutation_count();

    h.surface.set_available(false);
    gate.notify_one();
    h.settle().await;

    assert_eq!(h.surface.mutation_count(), mutations);
    assert_eq!(h.state(), ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn vanished_context_skips_pending_selection() {
    let h = Harness::new();
    h.surface.set_available(false);

    h.select("hello", 100.0, 100.0).await;
    h.settle().await;

    assert!(h.client.calls().is_empty());
    assert_eq!(h.surface.mutation_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn shutdown_tears_down_session() {
    let mut h = Harness::new();
    let gate = Arc::new(Notify::new());
    h.client.script(
        "slow",
        Script::gated(LookupResult::Success(entry("never")), &gate, true),
    );

    h.select("slow", 100.0, 100.0).await;
    h.settle().await;
    assert_eq!(h.surface.mounted_count(), 1);

    h.shutdown.cancel();
    (&mut h.task).await.unwrap().unwrap();

    assert_eq!(h.surface.mounted_count(), 0);
    assert_eq!(h.status.borrow().state, ControllerState::Idle);
    h.settle().await;
    assert_eq!(h.client.in_flight(), 0);
}
