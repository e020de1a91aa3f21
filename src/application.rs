use std::sync::Arc;

use cosmic::app::{Core, Task as CosmicTask, context_drawer};
use cosmic::iced::Length;
use cosmic::iced::task::Handle;
use cosmic::widget::{button, container, icon, row, scrollable, text, text_editor};
use cosmic::{Application, Element, executor};

use notepin::config::{APP_ID, NotepinConfig};
use notepin::core::confirm::DeleteDialog;
use notepin::core::debounce::{Cancel, Debounce};
use notepin::core::editor::{Editor, SaveRequest, SaveTicket};
use notepin::core::note::{NoteId, NotePatch};
use notepin::core::note_list::NoteList;
use notepin::core::notice::{Notices, Operation};
use notepin::store::{self, MemoryStore, NoteStore};

use crate::message::Message;
use crate::pages;
use crate::style;

/// The pending search timer. Dropping or replacing it aborts the sleep task.
struct PendingSearch(Handle);

impl Cancel for PendingSearch {
    fn cancel(&self) {
        self.0.abort();
    }
}

pub struct Flags {
    pub config: NotepinConfig,
}

pub struct Notepin {
    core: Core,
    store: Arc<dyn NoteStore>,

    /// Last snapshot and the view derived from it.
    notes: NoteList,

    // Search
    search_input: String,
    search: Debounce<PendingSearch>,

    // Dialogs
    editor: Editor,
    body_content: text_editor::Content,
    delete_dialog: DeleteDialog,

    notices: Notices,

    /// Keeps the live query running; aborted when the app drops.
    _live_query: Handle,
}

impl Application for Notepin {
    type Executor = executor::Default;
    type Flags = Flags;
    type Message = Message;

    const APP_ID: &'static str = APP_ID;

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, CosmicTask<Self::Message>) {
        let config = flags.config;
        let mut notices = Notices::default();

        let store: Arc<dyn NoteStore> = match store::open(&config) {
            Ok(store) => store,
            Err(e) => {
                notices.push(Operation::Subscribe, e.to_string());
                Arc::new(MemoryStore::new())
            }
        };

        // One standing query for the life of the window.
        let (live_query, handle) = CosmicTask::run(store.subscribe(), |result| {
            cosmic::Action::App(Message::Snapshot(result.map_err(|e| e.to_string())))
        })
        .abortable();

        let app = Self {
            core,
            store,
            notes: NoteList::default(),
            search_input: String::new(),
            search: Debounce::new(config.search_debounce()),
            editor: Editor::default(),
            body_content: text_editor::Content::new(),
            delete_dialog: DeleteDialog::default(),
            notices,
            _live_query: handle.abort_on_drop(),
        };

        (app, live_query)
    }

    fn header_start(&self) -> Vec<Element<'_, Message>> {
        vec![text::body(pages::notes::count_label(&self.notes)).into()]
    }

    fn header_center(&self) -> Vec<Element<'_, Message>> {
        vec![pages::notes::search_box(&self.search_input)]
    }

    fn header_end(&self) -> Vec<Element<'_, Message>> {
        vec![
            row()
                .spacing(4)
                .push(
                    button::icon(icon::from_name("list-add-symbolic"))
                        .on_press(Message::OpenCreate),
                )
                .into(),
        ]
    }

    fn update(&mut self, message: Message) -> CosmicTask<Message> {
        match message {
            Message::Snapshot(Ok(notes)) => {
                log::debug!("Snapshot with {} notes", notes.len());
                self.notes.replace_snapshot(notes);
                self.notices.clear(Operation::Subscribe);

                let notes = &self.notes;
                self.editor.reconcile(|id| notes.get(id).is_some());
                self.delete_dialog.reconcile(|id| notes.get(id).is_some());
                if !self.editor.is_open() {
                    self.core.window.show_context = false;
                }
            }

            Message::Snapshot(Err(e)) => {
                self.notices.push(Operation::Subscribe, e);
            }

            Message::SearchInput(value) => {
                self.search_input = value.clone();
                let (task, handle) = CosmicTask::perform(
                    tokio::time::sleep(self.search.delay()),
                    move |_| cosmic::Action::App(Message::SearchSettled(value.clone())),
                )
                .abortable();
                self.search.replace(PendingSearch(handle));
                return task;
            }

            Message::SearchSettled(query) => {
                self.search.settle();
                self.notes.apply_query(&query);
                log::debug!(
                    "Search {:?}: {} of {} notes",
                    query,
                    self.notes.visible_len(),
                    self.notes.len()
                );
            }

            Message::OpenCreate => {
                self.editor.open_create();
                self.body_content = text_editor::Content::new();
                self.core.window.show_context = true;
            }

            Message::OpenEdit(id) => {
                if let Some(note) = self.notes.get(&id) {
                    self.editor.open_edit(note);
                    self.body_content = text_editor::Content::with_text(&note.body);
                    self.core.window.show_context = true;
                }
            }

            Message::CloseEditor => {
                self.close_editor();
            }

            Message::EditorTitle(value) => {
                self.editor.title = value;
            }

            Message::EditorBodyAction(action) => {
                self.body_content.perform(action);
                let mut body = self.body_content.text();
                if body.ends_with('\n') {
                    body.pop();
                }
                self.editor.body = body;
            }

            Message::EditorTags(value) => {
                self.editor.tags = value;
            }

            Message::SaveEditor => {
                if let Some((ticket, request)) = self.editor.save() {
                    return self.perform_save(ticket, request);
                }
            }

            Message::Saved(operation, ticket, result) => match result {
                Ok(()) => {
                    if self.editor.save_succeeded(ticket) {
                        self.core.window.show_context = false;
                    }
                }
                Err(e) => {
                    self.editor.save_failed(ticket);
                    self.notices.push(operation, e);
                }
            },

            Message::TogglePin(id) => {
                if let Some(note) = self.notes.get(&id) {
                    let store = self.store.clone();
                    let patch = NotePatch::pinned(!note.pinned);
                    return CosmicTask::perform(
                        async move { store.update(&id, patch).await.map_err(|e| e.to_string()) },
                        |result| cosmic::Action::App(Message::PinToggled(result)),
                    );
                }
            }

            Message::PinToggled(result) => {
                if let Err(e) = result {
                    self.notices.push(Operation::TogglePin, e);
                }
            }

            Message::ConfirmDelete(id) => {
                if let Some(note) = self.notes.get(&id) {
                    self.delete_dialog.open(note);
                }
            }

            Message::CancelDelete => {
                self.delete_dialog.cancel();
            }

            Message::DeleteConfirmed => {
                if let Some(id) = self.delete_dialog.confirm() {
                    return self.perform_delete(id);
                }
            }

            Message::Deleted(id, result) => {
                if let Err(ref e) = result {
                    self.notices.push(Operation::Delete, e.clone());
                }
                self.delete_dialog.finish(&id, result);
            }

            Message::DismissNotice(id) => {
                self.notices.dismiss(id);
            }
        }

        CosmicTask::none()
    }

    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Message>> {
        if !self.editor.is_open() {
            return None;
        }

        Some(
            context_drawer::context_drawer(
                container(scrollable(
                    pages::notes::editor_form(&self.editor, &self.body_content)
                        .padding(style::DRAWER_PADDING),
                ))
                .width(Length::Fill),
                Message::CloseEditor,
            )
            .title(pages::notes::editor_title(&self.editor)),
        )
    }

    fn dialog(&self) -> Option<Element<'_, Message>> {
        self.delete_dialog.pending().map(pages::notes::delete_dialog)
    }

    fn on_escape(&mut self) -> CosmicTask<Message> {
        if self.delete_dialog.is_open() {
            self.delete_dialog.cancel();
        } else if self.editor.is_open() {
            self.close_editor();
        }
        CosmicTask::none()
    }

    fn subscription(&self) -> cosmic::iced::Subscription<Message> {
        cosmic::iced::event::listen_with(|event, _status, _id| match event {
            cosmic::iced::Event::Keyboard(cosmic::iced::keyboard::Event::KeyPressed {
                key: cosmic::iced::keyboard::Key::Character(ref c),
                modifiers,
                ..
            }) if c.as_str() == "n" && modifiers.control() => Some(Message::OpenCreate),
            _ => None,
        })
    }

    fn view(&self) -> Element<'_, Message> {
        pages::notes::notes_view(&self.notes, &self.notices)
    }
}

impl Notepin {
    fn close_editor(&mut self) {
        self.editor.close();
        self.body_content = text_editor::Content::new();
        self.core.window.show_context = false;
    }

    fn perform_save(&self, ticket: SaveTicket, request: SaveRequest) -> CosmicTask<Message> {
        let store = self.store.clone();
        match request {
            SaveRequest::Create(draft) => CosmicTask::perform(
                async move {
                    store
                        .add(draft)
                        .await
                        .map(|id| log::info!("Created note {}", id))
                        .map_err(|e| e.to_string())
                },
                move |result| cosmic::Action::App(Message::Saved(Operation::Create, ticket, result)),
            ),
            SaveRequest::Update(id, draft) => CosmicTask::perform(
                async move {
                    store
                        .update(&id, NotePatch::content(draft))
                        .await
                        .map_err(|e| e.to_string())
                },
                move |result| cosmic::Action::App(Message::Saved(Operation::Update, ticket, result)),
            ),
        }
    }

    fn perform_delete(&self, id: NoteId) -> CosmicTask<Message> {
        let store = self.store.clone();
        let target = id.clone();
        CosmicTask::perform(
            async move { store.delete(&target).await.map_err(|e| e.to_string()) },
            move |result| cosmic::Action::App(Message::Deleted(id.clone(), result)),
        )
    }
}
