//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! App is intentionally lean - it coordinates between components but
//! does not contain business logic itself.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    centered_popup, CreateProjectDialog, EditorComponent, GalleryComponent, GalleryRenderContext,
    HelpDialog, LoginComponent, QuitDialog, ReportComponent, SplashComponent, UploadDialog,
};
use crate::config::Config;
use crate::model::domain::DomainState;
use crate::model::modal::{Modal, ModalStack};
use crate::model::record::sanitize_title;
use crate::model::ui::{AppMode, View};
use crate::services::{self, export, PersistWorker, SessionManager, Store, StoreError};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};
use std::fs;
use std::path::{Path, PathBuf};

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Current application mode
    pub mode: AppMode,

    /// Active main view while running
    pub view: View,

    /// Domain state (business data)
    pub domain: DomainState,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Background annotation writer
    pub persist: PersistWorker,

    /// Account registry and on-disk session
    pub sessions: SessionManager,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub splash: SplashComponent,
    pub login: LoginComponent,
    pub gallery: GalleryComponent,
    pub report: ReportComponent,
    pub editor: EditorComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
    pub create_project_dialog: CreateProjectDialog,
    pub upload_dialog: UploadDialog,

    /// Current config
    pub config: Config,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create a new App instance
    pub fn new() -> App {
        let config = Config::load_or_init();
        let data_dir = PathBuf::from(&config.data_dir);
        App {
            mode: AppMode::Splash,
            view: View::default(),
            domain: DomainState::new(),
            modals: ModalStack::new(),
            persist: PersistWorker::new(data_dir.clone()),
            sessions: SessionManager::new(data_dir),
            should_quit: false,
            status_message: None,
            // Components
            splash: SplashComponent::new(),
            login: LoginComponent::new(),
            gallery: GalleryComponent::new(),
            report: ReportComponent::new(config.page_size),
            editor: EditorComponent::new(),
            quit_dialog: QuitDialog,
            help_dialog: HelpDialog::default(),
            create_project_dialog: CreateProjectDialog,
            upload_dialog: UploadDialog,
            config,
        }
    }

    fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.data_dir)
    }

    fn open_store(&self) -> Result<Store, StoreError> {
        Store::open(self.data_dir())
    }

    /// Export directory from config, created on first use.
    fn export_dir(&self) -> Result<PathBuf> {
        let dir = PathBuf::from(&self.config.export_dir);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn report_store_error(&mut self, err: StoreError) {
        self.modals.push(Modal::ErrorNotice {
            code: err.code,
            message: err.message,
        });
    }

    /// Enter the running state for a logged-in user.
    fn enter_session(&mut self, user: String) {
        self.domain = DomainState::new();
        self.domain.vocabulary = services::load_vocabulary(&self.data_dir());
        self.domain.user = Some(user);
        self.gallery = GalleryComponent::new();
        self.reload_projects();
        self.view = View::Gallery;
        self.mode = AppMode::Running;
    }

    fn reload_projects(&mut self) {
        let Some(user) = self.domain.user.clone() else {
            return;
        };
        match self.open_store().and_then(|s| s.projects_for(&user)) {
            Ok(projects) => self.domain.projects = projects,
            Err(err) => {
                self.report_store_error(err);
                return;
            }
        }
        self.gallery
            .sync(self.domain.projects.len(), self.domain.images.len());
        self.sync_selection();
    }

    fn reload_images(&mut self) {
        match self.domain.selected_project {
            Some(project_id) => {
                match self.open_store().and_then(|s| s.images_for(project_id)) {
                    Ok(images) => self.domain.images = images,
                    Err(err) => {
                        self.domain.images.clear();
                        self.report_store_error(err);
                    }
                }
            }
            None => self.domain.images.clear(),
        }
        self.gallery
            .sync(self.domain.projects.len(), self.domain.images.len());
    }

    /// Mirror the gallery cursor into the domain selection. Switching
    /// project reloads its images and puts the image cursor back on top.
    fn sync_selection(&mut self) {
        let project_id = self
            .domain
            .projects
            .get(self.gallery.project_index)
            .map(|p| p.id);
        if project_id != self.domain.selected_project {
            self.domain.selected_project = project_id;
            self.gallery.reset_image_cursor();
            self.reload_images();
        }
        self.domain.selected_image = self
            .domain
            .images
            .get(self.gallery.image_index)
            .map(|i| i.id);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.splash.init()?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.mode {
            AppMode::Splash => self.splash.handle_key_event(key),
            AppMode::Login => self.login.handle_key_event(key),
            AppMode::Running => {
                if let Some(modal) = self.modals.top().cloned() {
                    self.handle_modal_key_event(&modal, key)
                } else {
                    match self.view {
                        View::Gallery => self.gallery.handle_key_event(key),
                        View::Report => self.report.handle_key_event(key),
                    }
                }
            }
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        // Only the annotation editor reacts to the mouse.
        if self.mode == AppMode::Running && self.modals.top() == Some(&Modal::ImageEditor) {
            return self.editor.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                if self.mode == AppMode::Splash && self.splash.is_complete() {
                    return Ok(Some(Action::SplashComplete));
                }
                // Surface finished background writes
                for err in self.persist.poll() {
                    self.report_store_error(err);
                }
                // Debounced filters fire on ticks
                if self.view == View::Report {
                    self.report.update(Action::Tick)?;
                }
            }
            Action::SplashComplete => match self.sessions.current() {
                Some(user) => self.enter_session(user),
                None => self.mode = AppMode::Login,
            },
            Action::ForceQuit => {
                // Finish queued annotation writes before the terminal goes away
                for err in self.persist.drain(std::time::Duration::from_secs(5)) {
                    eprintln!("write failed during shutdown: {}", err.message);
                }
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Accounts
            // ─────────────────────────────────────────────────────────────────
            Action::SubmitLogin {
                username,
                password,
                register,
            } => {
                if register {
                    if let Err(err) = self.sessions.register(&username, &password) {
                        self.login.set_error(err.message);
                        return Ok(None);
                    }
                }
                match self.sessions.login(&username, &password) {
                    Ok(user) => {
                        self.login.reset();
                        self.enter_session(user);
                    }
                    Err(err) => self.login.set_error(err.message),
                }
            }
            Action::Logout => {
                self.sessions.logout();
                self.login.reset();
                self.domain = DomainState::new();
                self.status_message = None;
                self.view = View::Gallery;
                self.mode = AppMode::Login;
            }

            // ─────────────────────────────────────────────────────────────────
            // Navigation (delegate to GalleryComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem => {
                self.gallery
                    .next(self.domain.projects.len(), self.domain.images.len());
                self.sync_selection();
            }
            Action::PrevItem => {
                self.gallery.previous();
                self.sync_selection();
            }
            Action::OpenGallery => {
                self.report.deactivate();
                self.view = View::Gallery;
            }
            Action::OpenReport => {
                self.report.set_records(&self.domain.images);
                self.view = View::Report;
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help { scroll_offset: 0 });
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if self.modals.top() == Some(&Modal::ClearConfirm) {
                    self.modals.pop();
                    return Ok(Some(Action::ClearAnnotations));
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Projects and Images
            // ─────────────────────────────────────────────────────────────────
            Action::OpenCreateProject => {
                self.modals.push(Modal::CreateProject {
                    title: String::new(),
                });
            }
            Action::CreateProject(raw) => {
                self.modals.pop();
                let title = sanitize_title(&raw);
                if title.is_empty() {
                    self.status_message =
                        Some("project title needs at least one letter or digit".to_string());
                    return Ok(None);
                }
                let Some(user) = self.domain.user.clone() else {
                    return Ok(None);
                };
                match self.open_store().and_then(|s| s.create_project(&user, &title)) {
                    Ok(project) => {
                        self.status_message = Some(format!("created project '{}'", project.title));
                        self.reload_projects();
                        if let Some(idx) =
                            self.domain.projects.iter().position(|p| p.id == project.id)
                        {
                            self.gallery.project_index = idx;
                            self.sync_selection();
                        }
                    }
                    Err(err) => self.report_store_error(err),
                }
            }
            Action::OpenUploadImage => {
                if self.domain.selected_project.is_some() {
                    self.modals.push(Modal::UploadImage {
                        path: String::new(),
                    });
                } else {
                    self.status_message = Some("create a project first".to_string());
                }
            }
            Action::UploadImage(path) => {
                self.modals.pop();
                let Some(project_id) = self.domain.selected_project else {
                    return Ok(None);
                };
                let source = path.trim().to_string();
                match self
                    .open_store()
                    .and_then(|s| s.add_image(project_id, Path::new(&source)))
                {
                    Ok(record) => {
                        self.status_message = Some(format!("uploaded {}", record.filename));
                        self.reload_images();
                        if let Some(idx) =
                            self.domain.images.iter().position(|i| i.id == record.id)
                        {
                            self.gallery.image_index = idx;
                        }
                        self.sync_selection();
                    }
                    Err(err) => self.report_store_error(err),
                }
            }
            Action::OpenImageEditor => {
                if let Some(image) = self.domain.selected_image_record() {
                    self.editor.open(image, self.domain.vocabulary.clone());
                    self.modals.push(Modal::ImageEditor);
                }
            }
            Action::OpenClearConfirm => {
                if self.domain.selected_image_record().is_some() {
                    self.modals.push(Modal::ClearConfirm);
                }
            }
            Action::ClearAnnotations => {
                let Some(id) = self.domain.selected_image else {
                    return Ok(None);
                };
                if let Some(image) = self.domain.image_mut(id) {
                    image.annotations.clear();
                    let snapshot = image.clone();
                    self.editor.set_annotations(Vec::new());
                    self.persist.save_image(snapshot);
                    self.status_message = Some("annotations cleared".to_string());
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Annotation
            // ─────────────────────────────────────────────────────────────────
            Action::CommitAnnotation(annotation) => {
                let Some(id) = self.domain.selected_image else {
                    return Ok(None);
                };
                if let Some(image) = self.domain.image_mut(id) {
                    image.annotations.push(annotation);
                    let snapshot = image.clone();
                    self.editor.set_annotations(snapshot.annotations.clone());
                    self.persist.save_image(snapshot);
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Exports
            // ─────────────────────────────────────────────────────────────────
            Action::ExportImageCsv => {
                if let Some(image) = self.domain.selected_image_record().cloned() {
                    let outcome = self
                        .export_dir()
                        .and_then(|dir| export::export_image_annotations(&dir, &image));
                    self.status_message = Some(match outcome {
                        Ok(path) => format!("exported {}", path.display()),
                        Err(e) => format!("export failed: {e}"),
                    });
                }
            }
            Action::ExportProjectCsv => {
                let project = self
                    .domain
                    .selected_project
                    .and_then(|id| self.domain.project(id))
                    .cloned();
                if let Some(project) = project {
                    let outcome = self.export_dir().and_then(|dir| {
                        export::export_project_annotations(&dir, &project, &self.domain.images)
                    });
                    self.status_message = Some(match outcome {
                        Ok(path) => format!("exported {}", path.display()),
                        Err(e) => format!("export failed: {e}"),
                    });
                }
            }
            Action::ExportReportCsv => {
                let (headers, rows) = self.report.export_data();
                let outcome = self
                    .export_dir()
                    .and_then(|dir| export::export_report(&dir, &headers, &rows));
                self.status_message = Some(match outcome {
                    Ok(path) => format!("exported {}", path.display()),
                    Err(e) => format!("export failed: {e}"),
                });
            }
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.mode {
            AppMode::Splash => self.splash.draw(frame, area)?,
            AppMode::Login => self.login.draw(frame, area)?,
            AppMode::Running => {
                match self.view {
                    View::Gallery => {
                        let ctx = GalleryRenderContext {
                            user: self.domain.user.as_deref().unwrap_or(""),
                            projects: &self.domain.projects,
                            images: &self.domain.images,
                            status_message: self.status_message.as_deref(),
                        };
                        self.gallery.draw_with_state(frame, area, &ctx)?;
                    }
                    View::Report => {
                        let status = self.status_message.clone();
                        self.report.draw_with_status(frame, area, status.as_deref())?;
                    }
                }

                // Draw modal overlay if active
                if let Some(modal) = self.modals.top().cloned() {
                    self.draw_modal(frame, area, &modal)?;
                }
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::ImageEditor => self.editor.handle_key_event(key),
            Modal::CreateProject { title } => {
                let action = match key.code {
                    KeyCode::Esc => Some(Action::CloseModal),
                    KeyCode::Enter => Some(Action::CreateProject(title.clone())),
                    KeyCode::Backspace => {
                        if let Some(Modal::CreateProject { title }) = self.modals.top_mut() {
                            title.pop();
                        }
                        None
                    }
                    KeyCode::Char(c) => {
                        if let Some(Modal::CreateProject { title }) = self.modals.top_mut() {
                            title.push(c);
                        }
                        None
                    }
                    _ => None,
                };
                Ok(action)
            }
            Modal::UploadImage { path } => {
                let action = match key.code {
                    KeyCode::Esc => Some(Action::CloseModal),
                    KeyCode::Enter => Some(Action::UploadImage(path.clone())),
                    KeyCode::Backspace => {
                        if let Some(Modal::UploadImage { path }) = self.modals.top_mut() {
                            path.pop();
                        }
                        None
                    }
                    KeyCode::Char(c) => {
                        if let Some(Modal::UploadImage { path }) = self.modals.top_mut() {
                            path.push(c);
                        }
                        None
                    }
                    _ => None,
                };
                Ok(action)
            }
            Modal::ClearConfirm => {
                let action = match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                        Some(Action::ConfirmModal)
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        Some(Action::CloseModal)
                    }
                    _ => None,
                };
                Ok(action)
            }
            // Any key dismisses an error notice.
            Modal::ErrorNotice { .. } => Ok(Some(Action::CloseModal)),
            Modal::Help { .. } => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => {
                let pending = self.persist.in_flight();
                self.quit_dialog.draw_with_pending(frame, area, pending)?;
            }
            Modal::ImageEditor => self.editor.draw(frame, area)?,
            Modal::CreateProject { title } => {
                self.create_project_dialog.draw_with_input(frame, area, title)?;
            }
            Modal::UploadImage { path } => {
                self.upload_dialog.draw_with_input(frame, area, path)?;
            }
            Modal::ClearConfirm => self.draw_clear_confirm(frame, area)?,
            Modal::ErrorNotice { code, message } => {
                self.draw_error_notice(frame, area, *code, message)?;
            }
            Modal::Help { .. } => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }

    /// Draw the clear-annotations confirmation modal
    fn draw_clear_confirm(&self, frame: &mut Frame, area: Rect) -> Result<()> {
        use ratatui::style::{Color, Modifier, Style};
        use ratatui::text::{Line, Span};
        use ratatui::widgets::{Block, Borders, Clear, Paragraph};

        let popup_area = centered_popup(area, 50, 8);
        frame.render_widget(Clear, popup_area);

        let count = self
            .domain
            .selected_image_record()
            .map(|img| img.annotations.len())
            .unwrap_or(0);

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Delete {} annotation{} on this image?",
                    count,
                    if count == 1 { "" } else { "s" }
                ),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " y ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw("Delete  "),
                Span::styled(
                    " n/Esc ",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw("Keep"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Clear Annotations ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            )
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }

    /// Draw a persistence failure notice
    fn draw_error_notice(
        &self,
        frame: &mut Frame,
        area: Rect,
        code: i32,
        message: &str,
    ) -> Result<()> {
        use ratatui::style::{Color, Modifier, Style};
        use ratatui::text::{Line, Span};
        use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

        let popup_area = centered_popup(area, 60, 9);
        frame.render_widget(Clear, popup_area);

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::White),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "press any key to dismiss",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(format!(" Error {} ", code))
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            )
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}
