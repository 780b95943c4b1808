use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{mpsc, Arc};

use prism_core::buffer::PixelBuffer;
use prism_core::config::ViewerConfig;
use prism_core::decompose::DecomposeMode;
use prism_core::task::{
    Decomposer, DecompositionResult, DecompositionTask, Dispatch, ExecutionPath, InteractionGate,
    TaskState,
};
use prism_core::viewport::{MeasurementLine, PixelProbe, SamplingFilter, ViewportController};

use crate::convert::buffer_to_color_image;
use crate::messages::AppMessage;
use crate::panels;
use crate::state::{UIState, ViewKind};

/// Size of the blank canvas shown before any image is opened.
const PLACEHOLDER_SIZE: (u32, u32) = (640, 480);

pub struct PrismApp {
    pub msg_tx: mpsc::Sender<AppMessage>,
    pub msg_rx: mpsc::Receiver<AppMessage>,
    pub config: ViewerConfig,
    pub viewport: ViewportController,
    pub decomposer: Decomposer,
    pub gate: InteractionGate,
    pub task: Option<DecompositionTask>,
    /// The image as loaded, kept for "Show Original" and re-splitting.
    pub original: Option<Arc<PixelBuffer>>,
    pub probe: Rc<Cell<PixelProbe>>,
    pub last_line: Rc<Cell<Option<MeasurementLine>>>,
    pub ui_state: UIState,
    texture: Option<(u64, SamplingFilter, egui::TextureHandle)>,
}

impl PrismApp {
    pub fn new(ctx: &egui::Context, config: ViewerConfig, initial: Option<PathBuf>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        let gate = InteractionGate::new();
        let decomposer = Decomposer::new(config.decomposition.clone(), gate.clone());

        let probe = Rc::new(Cell::new(PixelProbe::Outside));
        let last_line = Rc::new(Cell::new(None));

        let mut viewport = ViewportController::new(config.viewport.clone());
        let sink = Rc::clone(&probe);
        viewport.set_pixel_probe_callback(move |p| sink.set(p));
        let sink = Rc::clone(&last_line);
        viewport.set_line_ready_callback(move |line| sink.set(Some(line)));
        viewport.display_placeholder(PLACEHOLDER_SIZE.0, PLACEHOLDER_SIZE.1);

        let app = Self {
            msg_tx,
            msg_rx,
            config,
            viewport,
            decomposer,
            gate,
            task: None,
            original: None,
            probe,
            last_line,
            ui_state: UIState::default(),
            texture: None,
        };

        if let Some(path) = initial {
            app.load_in_background(ctx, path);
        }
        app
    }

    /// Decode `path` on a helper thread; the result arrives as a message.
    pub fn load_in_background(&self, ctx: &egui::Context, path: PathBuf) {
        let tx = self.msg_tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let _ = tx.send(AppMessage::load(path));
            ctx.request_repaint();
        });
    }

    /// Drain all pending messages from helper threads.
    fn poll_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg {
                AppMessage::ImageLoaded { path, image } => {
                    self.ui_state.add_log(format!(
                        "Opened: {} ({}x{}, {})",
                        path.display(),
                        image.width(),
                        image.height(),
                        image.format()
                    ));
                    let image = Arc::new(image);
                    self.original = Some(Arc::clone(&image));
                    self.viewport.clear_line();
                    self.last_line.set(None);
                    self.viewport.display(image, true);
                    self.ui_state.file_path = Some(path);
                    self.ui_state.view = ViewKind::Original;
                }
                AppMessage::ImageSaved { path } => {
                    self.ui_state.add_log(format!("Saved: {}", path.display()));
                }
                AppMessage::Error { message } => {
                    tracing::error!("{message}");
                    self.ui_state.add_log(format!("ERROR: {message}"));
                }
            }
        }
    }

    /// Hand a finished background split to the viewport, exactly once.
    fn poll_task(&mut self) {
        let Some(task) = self.task.as_mut() else {
            return;
        };
        let mut finished = None;
        task.poll(|result| finished = Some(result));
        if task.state() == TaskState::Done {
            self.task = None;
        }
        if let Some(result) = finished {
            self.show_split(result);
        }
    }

    pub fn request_split(&mut self, ctx: &egui::Context, mode: DecomposeMode) {
        let Some(image) = self.original.clone() else {
            return;
        };
        if image.is_grayscale() {
            self.ui_state
                .add_log("Image is grayscale, nothing to split".into());
        }
        let ctx = ctx.clone();
        match self
            .decomposer
            .request_with_waker(image, mode, move || ctx.request_repaint())
        {
            Ok(Dispatch::Ready(result)) => self.show_split(result),
            Ok(Dispatch::Scheduled(task)) => {
                self.ui_state.add_log(format!(
                    "Splitting {} ({mode}) on a worker thread...",
                    task.request()
                ));
                self.task = Some(task);
            }
            Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
        }
    }

    fn show_split(&mut self, result: DecompositionResult) {
        let how = match result.path {
            ExecutionPath::Synchronous => "",
            ExecutionPath::Background => " in background",
        };
        self.ui_state.add_log(format!(
            "Split {} {} -> {}x{}{how} ({})",
            result.request,
            result.mode,
            result.buffer.width(),
            result.buffer.height(),
            format_duration(result.elapsed)
        ));
        self.viewport.display(result.buffer, true);
        self.ui_state.view = ViewKind::Split(result.mode);
    }

    pub fn show_original(&mut self) {
        if let Some(image) = self.original.clone() {
            self.viewport.display(image, true);
            self.ui_state.view = ViewKind::Original;
        }
    }

    pub fn clear_line(&mut self) {
        self.viewport.clear_line();
        self.last_line.set(None);
    }

    /// Texture for the displayed buffer, re-uploaded when the buffer or
    /// the sampling filter changes.
    pub fn texture_id(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        let generation = self.viewport.generation();
        let filter = self.viewport.sampling_filter();
        let stale = !matches!(
            &self.texture,
            Some((g, f, _)) if *g == generation && *f == filter
        );
        if stale {
            self.texture = self.viewport.buffer().map(|buffer| {
                let options = match filter {
                    SamplingFilter::Nearest => egui::TextureOptions::NEAREST,
                    SamplingFilter::Bilinear => egui::TextureOptions::LINEAR,
                };
                let handle = ctx.load_texture("viewport", buffer_to_color_image(buffer), options);
                (generation, filter, handle)
            });
        }
        self.texture.as_ref().map(|(_, _, t)| t.id())
    }
}

impl eframe::App for PrismApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages();
        self.poll_task();

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::canvas::show(ctx, self);
    }
}

pub fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", d.as_millis())
    } else {
        format!("{secs:.1}s")
    }
}
