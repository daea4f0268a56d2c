use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender},
        OnceLock,
    },
    thread::{self, JoinHandle},
};

use crate::utility::app_root_dir;

/* =========================
   GLOBAL STATE
   ========================= */

static DEBUG: AtomicBool = AtomicBool::new(false);
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
static LOG_TX: OnceLock<Sender<String>> = OnceLock::new();
static INFO: AtomicBool = AtomicBool::new(false);

/* =========================
   PUBLIC API
   ========================= */

/// Starts the background writer. Later calls are ignored.
pub fn init(debug: bool, level: &str) {
    DEBUG.store(debug, Ordering::Relaxed);
    set_level(level);

    let path = log_path().clone();
    let (tx, rx) = mpsc::channel::<String>();
    if LOG_TX.set(tx).is_err() {
        return;
    }

    spawn_writer(path, rx);
}

pub fn set_debug(debug: bool) {
    DEBUG.store(debug, Ordering::Relaxed);
}

/// `info` and `debug` let INFO lines through; anything else keeps WARN and up.
pub fn set_level(level: &str) {
    let level = level.trim().to_ascii_lowercase();
    INFO.store(level == "info" || level == "debug", Ordering::Relaxed);
}

#[inline]
pub fn should_log(level: &str) -> bool {
    if DEBUG.load(Ordering::Relaxed) {
        return true;
    }

    match level {
        "WARN" | "ERROR" => true,
        "INFO" => INFO.load(Ordering::Relaxed),
        _ => false,
    }
}

/* =========================
   INTERNAL
   ========================= */

#[inline]
pub fn enqueue(level: &str, msg: String) {
    if let Some(tx) = LOG_TX.get() {
        let _ = tx.send(format_line(&timestamp(), level, &msg));
    }
}

/// Creates the log directory on first run, then opens the file for appending.
fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).ok()?;
    }

    OpenOptions::new().create(true).append(true).open(path).ok()
}

fn spawn_writer(path: PathBuf, rx: Receiver<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        let Some(mut file) = open_log_file(&path) else {
            // Nowhere to write; drain so senders never block on a dead receiver.
            while rx.recv().is_ok() {}
            return;
        };

        while let Ok(line) = rx.recv() {
            let _ = writeln!(file, "{line}");
            let _ = file.flush();
        }
    })
}

fn format_line(ts: &str, level: &str, msg: &str) -> String {
    format!("{ts} [{level}] {msg}")
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/* =========================
   MACROS
   ========================= */

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        if $crate::logging::should_log("INFO") {
            $crate::logging::enqueue("INFO", format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        $crate::logging::enqueue("WARN", format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        $crate::logging::enqueue("ERROR", format!($($arg)*));
    }};
}

/* =========================
   PATH
   ========================= */

pub fn log_path() -> &'static PathBuf {
    LOG_PATH.get_or_init(|| {
        app_root_dir()
            .map(|p| p.join("wallguard.log"))
            .unwrap_or_else(|| PathBuf::from("wallguard.log"))
    })
}
