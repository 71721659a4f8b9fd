//! Tasklight entry point
//!
//! Wires the DOM to the task store on the web; the native build runs a
//! logged smoke scenario.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement};

    use tasklight::storage::LocalStorage;
    use tasklight::validate::{NameLengthError, validate_name};
    use tasklight::{Priority, Task, TaskPatch, TaskStore, Theme, UNDO_WINDOW_MS};

    /// App instance holding all state
    struct App {
        store: TaskStore<LocalStorage>,
        theme: Theme,
        /// Armed undo expiry timeout: (timeout handle, batch generation).
        undo_timer: Option<(i32, u64)>,
        /// Task currently open for inline rename.
        editing_id: Option<String>,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tasklight starting...");

        let mut store = TaskStore::new(LocalStorage);
        store.load();
        let theme = Theme::load(&LocalStorage);

        let app = Rc::new(RefCell::new(App {
            store,
            theme,
            undo_timer: None,
            editing_id: None,
        }));

        apply_theme(theme);
        setup_add_form(app.clone());
        setup_remove_completed(app.clone());
        setup_undo_toast(app.clone());
        setup_theme_toggle(app.clone());
        render(&app);

        log::info!("Tasklight running!");
    }

    fn document() -> Document {
        web_sys::window().expect("no window").document().expect("no document")
    }

    /// Priority as the original's star marker (1 = ★★★, 3 = ★).
    fn stars(priority: Priority) -> String {
        "★".repeat(4 - priority.value() as usize)
    }

    /// Re-render everything derived from store state: the sorted list,
    /// the open-task counter and the undo toast.
    fn render(app: &Rc<RefCell<App>>) {
        let document = document();
        let (tasks, uncompleted, undo_len, editing_id) = {
            let a = app.borrow();
            (
                a.store.sorted(),
                a.store.uncompleted_count(),
                a.store.undo_batch().map(|b| b.len()),
                a.editing_id.clone(),
            )
        };

        if let Some(el) = document.get_element_by_id("open-count") {
            el.set_text_content(Some(&uncompleted.to_string()));
        }

        if let Some(list) = document.get_element_by_id("task-list") {
            list.set_inner_html("");
            if tasks.is_empty() {
                let empty = document.create_element("li").expect("create element");
                empty.set_class_name("empty");
                empty.set_text_content(Some("No tasks yet."));
                let _ = list.append_child(&empty);
            }
            for task in &tasks {
                let editing = editing_id.as_deref() == Some(task.id.as_str());
                let row = render_task_row(&document, app, task, editing);
                let _ = list.append_child(&row);
            }
        }

        if let Some(toast) = document.get_element_by_id("undo-toast") {
            match undo_len {
                Some(n) => {
                    let _ = toast.set_attribute("class", "toast");
                    if let Some(el) = document.get_element_by_id("undo-count") {
                        el.set_text_content(Some(&format!("{n} task(s) deleted")));
                    }
                }
                None => {
                    let _ = toast.set_attribute("class", "toast hidden");
                }
            }
        }
    }

    fn render_task_row(
        document: &Document,
        app: &Rc<RefCell<App>>,
        task: &Task,
        editing: bool,
    ) -> Element {
        let row = document.create_element("li").expect("create element");
        row.set_class_name(if task.is_done { "task done" } else { "task" });

        // Completion checkbox
        let checkbox: HtmlInputElement = document
            .create_element("input")
            .expect("create element")
            .dyn_into()
            .expect("not an input");
        checkbox.set_type("checkbox");
        checkbox.set_checked(task.is_done);
        {
            let app = app.clone();
            let id = task.id.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let checked = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .map(|i| i.checked())
                    .unwrap_or(false);
                app.borrow_mut().store.set_completion(&id, checked);
                render(&app);
            });
            let _ = checkbox
                .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        let _ = row.append_child(&checkbox);

        // Name: plain text, or an input while a rename is open
        if editing {
            let input: HtmlInputElement = document
                .create_element("input")
                .expect("create element")
                .dyn_into()
                .expect("not an input");
            input.set_type("text");
            input.set_value(&task.name);
            input.set_class_name("rename-input");
            {
                let app = app.clone();
                let id = task.id.clone();
                let closure =
                    Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                        match event.key().as_str() {
                            "Enter" => {
                                let value = event
                                    .target()
                                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                                    .map(|i| i.value())
                                    .unwrap_or_default();
                                let result = {
                                    let mut a = app.borrow_mut();
                                    let patch =
                                        TaskPatch { name: Some(value), ..Default::default() };
                                    let r = a.store.update(&id, patch);
                                    if r.is_ok() {
                                        a.editing_id = None;
                                    }
                                    r
                                };
                                match result {
                                    Ok(()) => render(&app),
                                    Err(err) => log::warn!("Rename rejected: {err}"),
                                }
                            }
                            "Escape" => {
                                app.borrow_mut().editing_id = None;
                                render(&app);
                            }
                            _ => {}
                        }
                    });
                let _ = input
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
                closure.forget();
            }
            let _ = row.append_child(&input);
        } else {
            let name = document.create_element("span").expect("create element");
            name.set_class_name("task-name");
            name.set_text_content(Some(&task.name));
            {
                let app = app.clone();
                let id = task.id.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    app.borrow_mut().editing_id = Some(id.clone());
                    render(&app);
                });
                let _ = name
                    .add_event_listener_with_callback("dblclick", closure.as_ref().unchecked_ref());
                closure.forget();
            }
            let _ = row.append_child(&name);
        }

        let priority = document.create_element("span").expect("create element");
        priority.set_class_name("task-priority");
        priority.set_text_content(Some(&stars(task.priority)));
        let _ = row.append_child(&priority);

        if let Some(deadline) = task.deadline {
            let due = document.create_element("span").expect("create element");
            due.set_class_name("task-deadline");
            let local = deadline.with_timezone(&Local);
            due.set_text_content(Some(&format!("due {}", local.format("%Y-%m-%d %H:%M"))));
            let _ = row.append_child(&due);
        }

        // Delete button
        let delete = document.create_element("button").expect("create element");
        delete.set_class_name("delete-btn");
        delete.set_text_content(Some("Delete"));
        {
            let app = app.clone();
            let id = task.id.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().store.remove_one(&id);
                arm_undo_timer(&app);
                render(&app);
            });
            let _ =
                delete.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        let _ = row.append_child(&delete);

        row
    }

    fn setup_add_form(app: Rc<RefCell<App>>) {
        let document = document();

        // Live validation on every keystroke
        if let Some(input) = document.get_element_by_id("new-task-name") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let value = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .map(|i| i.value())
                    .unwrap_or_default();
                show_name_error(&self::document(), validate_name(&value).err());
            });
            let _ =
                input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("add-task-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let document = self::document();
                let name = input_value(&document, "new-task-name");
                let priority = selected_priority(&document);
                let deadline = parse_deadline_input(&input_value(&document, "new-task-deadline"));

                let result = app.borrow_mut().store.add(&name, priority, deadline);
                match result {
                    Ok(()) => {
                        clear_add_form(&document);
                        show_name_error(&document, None);
                        render(&app);
                    }
                    Err(err) => show_name_error(&document, Some(err)),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_remove_completed(app: Rc<RefCell<App>>) {
        if let Some(btn) = document().get_element_by_id("remove-completed-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().store.remove_completed();
                arm_undo_timer(&app);
                render(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_undo_toast(app: Rc<RefCell<App>>) {
        let document = document();

        if let Some(btn) = document.get_element_by_id("undo-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                cancel_undo_timer(&app);
                app.borrow_mut().store.undo();
                render(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("undo-dismiss-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                cancel_undo_timer(&app);
                app.borrow_mut().store.dismiss_undo();
                render(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_theme_toggle(app: Rc<RefCell<App>>) {
        if let Some(btn) = document().get_element_by_id("theme-toggle") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let theme = {
                    let mut a = app.borrow_mut();
                    a.theme = a.theme.toggled();
                    a.theme.save(&mut LocalStorage);
                    a.theme
                };
                apply_theme(theme);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn apply_theme(theme: Theme) {
        let document = document();
        if let Some(root) = document.document_element() {
            match theme {
                Theme::Dark => {
                    let _ = root.set_attribute("data-theme", "dark");
                }
                Theme::Light => {
                    let _ = root.remove_attribute("data-theme");
                }
            }
        }
        if let Some(btn) = document.get_element_by_id("theme-toggle") {
            let label = match theme {
                Theme::Dark => "Dark: ON",
                Theme::Light => "Dark: OFF",
            };
            btn.set_text_content(Some(label));
        }
    }

    /// Arm the 5-second expiry for the live batch, replacing a timer
    /// armed for an older batch. The callback carries the batch
    /// generation, so even a timeout that escapes cancellation cannot
    /// clear a newer batch.
    fn arm_undo_timer(app: &Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let generation = {
            let mut a = app.borrow_mut();
            let Some(generation) = a.store.undo_generation() else {
                return;
            };
            if let Some((handle, armed_generation)) = a.undo_timer {
                if armed_generation == generation {
                    // Already armed for this batch
                    return;
                }
                window.clear_timeout_with_handle(handle);
                a.undo_timer = None;
            }
            generation
        };

        let cb_app = app.clone();
        let closure = Closure::once(move || {
            {
                let mut a = cb_app.borrow_mut();
                if a.undo_timer.map(|(_, g)| g) == Some(generation) {
                    a.undo_timer = None;
                }
                a.store.expire_undo(generation);
            }
            render(&cb_app);
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            UNDO_WINDOW_MS as i32,
        ) {
            Ok(handle) => app.borrow_mut().undo_timer = Some((handle, generation)),
            Err(err) => log::error!("Failed to arm undo timer: {err:?}"),
        }
        closure.forget();
    }

    fn cancel_undo_timer(app: &Rc<RefCell<App>>) {
        if let Some((handle, _)) = app.borrow_mut().undo_timer.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }

    fn show_name_error(document: &Document, err: Option<NameLengthError>) {
        if let Some(el) = document.get_element_by_id("name-error") {
            match err {
                Some(e) => {
                    el.set_text_content(Some(&e.to_string()));
                    let _ = el.set_attribute("class", "field-error");
                }
                None => {
                    el.set_text_content(None);
                    let _ = el.set_attribute("class", "field-error hidden");
                }
            }
        }
        if let Some(input) = document.get_element_by_id("new-task-name") {
            let _ = input.set_attribute("class", if err.is_some() { "invalid" } else { "" });
        }
    }

    fn input_value(document: &Document, id: &str) -> String {
        document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
            .map(|i| i.value())
            .unwrap_or_default()
    }

    fn selected_priority(document: &Document) -> Priority {
        let Ok(radios) = document.query_selector_all("input[name='priority']") else {
            return Priority::default();
        };
        for i in 0..radios.length() {
            let Some(input) = radios.item(i).and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };
            if input.checked() {
                let parsed = input
                    .value()
                    .parse::<u8>()
                    .map_err(|e| e.to_string())
                    .and_then(Priority::try_from);
                if let Ok(p) = parsed {
                    return p;
                }
            }
        }
        Priority::default()
    }

    /// Parse a `datetime-local` input value as a local wall-clock time.
    /// The empty string (no deadline picked) maps to `None`.
    fn parse_deadline_input(raw: &str) -> Option<DateTime<Utc>> {
        if raw.is_empty() {
            return None;
        }
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
            .ok()?;
        Local
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn clear_add_form(document: &Document) {
        if let Some(input) = document
            .get_element_by_id("new-task-name")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value("");
        }
        if let Some(input) = document
            .get_element_by_id("new-task-deadline")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value("");
        }
        // Reset the priority radios to the lowest-priority default
        if let Ok(radios) = document.query_selector_all("input[name='priority']") {
            for i in 0..radios.length() {
                if let Some(input) =
                    radios.item(i).and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
                {
                    input.set_checked(input.value() == "3");
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tasklight (native) starting...");
    log::info!("The browser UI needs the wasm build - run with `trunk serve` for the web version");

    println!("\nRunning store smoke run...");
    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use tasklight::storage::MemoryStorage;
    use tasklight::{Priority, TaskStore};

    let mut store = TaskStore::new(MemoryStorage::new());
    store.load();
    store
        .add("Smoke-test the store", Priority::High, None)
        .expect("valid name");
    let id = store.tasks().last().expect("just added").id.clone();
    store.remove_one(&id);
    store.undo();
    assert!(
        store.tasks().iter().any(|t| t.id == id),
        "undo should restore the task"
    );
    println!("✓ Store smoke run passed!");
}
