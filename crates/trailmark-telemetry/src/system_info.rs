//! System information collector
//!
//! Static facts (culture, version, OS) are gathered once at startup and
//! attached to the telemetry session. Dynamic facts (memory) are point-in-time
//! and merged into a copy of the static map; the static map is never mutated.
//! Never includes hostname or username.

use tracing::debug;
use trailmark_core::domain::SystemInfo;

pub const KEY_CULTURE: &str = "Culture";
pub const KEY_ASSEMBLY_VERSION: &str = "AssemblyVersion";
pub const KEY_OS: &str = "OS";
pub const KEY_KERNEL: &str = "Kernel";
pub const KEY_DESKTOP: &str = "Desktop";
pub const KEY_ARCH: &str = "Arch";
pub const KEY_AVAILABLE_PHYSICAL_MEMORY: &str = "AvailablePhysicalMemory";
pub const KEY_AVAILABLE_VIRTUAL_MEMORY: &str = "AvailableVirtualMemory";
pub const KEY_TOTAL_PHYSICAL_MEMORY: &str = "TotalPhysicalMemory";

/// Culture code reported when the locale is unset, `C` or `POSIX`
pub const INVARIANT_CULTURE: &str = "ivl";

// ============================================================================
// Static information
// ============================================================================

/// Collects culture and version, then lets `platform` add OS facts.
///
/// `platform` runs synchronously; whatever it inserts wins over the
/// built-in keys.
pub fn collect_static(version: &str, platform: impl FnOnce(&mut SystemInfo)) -> SystemInfo {
    let mut info = SystemInfo::new();
    info.insert(KEY_CULTURE.to_string(), current_culture());
    info.insert(KEY_ASSEMBLY_VERSION.to_string(), version.to_string());
    platform(&mut info);
    info
}

/// Platform callback adding OS, kernel, desktop and architecture.
pub fn os_info_filler(info: &mut SystemInfo) {
    info.insert(KEY_OS.to_string(), std::env::consts::OS.to_string());
    info.insert(KEY_KERNEL.to_string(), read_kernel_version());
    info.insert(
        KEY_DESKTOP.to_string(),
        std::env::var("XDG_CURRENT_DESKTOP").unwrap_or_default(),
    );
    info.insert(KEY_ARCH.to_string(), std::env::consts::ARCH.to_string());
}

/// Device OS string attached to the telemetry session, e.g. `"linux 6.1.0"`.
pub fn device_os(info: &SystemInfo) -> String {
    let os = info
        .get(KEY_OS)
        .map(String::as_str)
        .unwrap_or(std::env::consts::OS);
    match info.get(KEY_KERNEL).filter(|k| !k.is_empty()) {
        Some(kernel) => format!("{os} {kernel}"),
        None => os.to_string(),
    }
}

fn read_kernel_version() -> String {
    std::fs::read_to_string("/proc/version")
        .ok()
        .and_then(|v| v.split_whitespace().nth(2).map(String::from))
        .unwrap_or_default()
}

fn current_culture() -> String {
    let locale = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty());
    culture_from_locale(locale.as_deref())
}

/// Maps a POSIX locale (`de_DE.UTF-8`) to a three-letter ISO 639-2 code.
pub fn culture_from_locale(locale: Option<&str>) -> String {
    let language = locale
        .and_then(|l| l.split(['_', '.', '@', '-']).next())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let code = match language.as_str() {
        "ar" => "ara",
        "bg" => "bul",
        "ca" => "cat",
        "cs" => "ces",
        "da" => "dan",
        "de" => "deu",
        "el" => "ell",
        "en" => "eng",
        "es" => "spa",
        "et" => "est",
        "fi" => "fin",
        "fr" => "fra",
        "he" => "heb",
        "hi" => "hin",
        "hr" => "hrv",
        "hu" => "hun",
        "id" => "ind",
        "it" => "ita",
        "ja" => "jpn",
        "ko" => "kor",
        "lt" => "lit",
        "lv" => "lav",
        "nb" | "no" => "nob",
        "nl" => "nld",
        "pl" => "pol",
        "pt" => "por",
        "ro" => "ron",
        "ru" => "rus",
        "sk" => "slk",
        "sl" => "slv",
        "sr" => "srp",
        "sv" => "swe",
        "th" => "tha",
        "tr" => "tur",
        "uk" => "ukr",
        "vi" => "vie",
        "zh" => "zho",
        // Already a three-letter code
        other if other.len() == 3 && other.chars().all(|c| c.is_ascii_lowercase()) => other,
        _ => INVARIANT_CULTURE,
    };
    code.to_string()
}

// ============================================================================
// Dynamic information
// ============================================================================

/// Point-in-time memory figures, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total_physical: u64,
    pub available_physical: u64,
    pub available_virtual: u64,
}

/// Returns a copy of `static_info` extended with current memory figures.
///
/// When memory cannot be read the copy carries the static facts only.
pub fn collect_dynamic(static_info: &SystemInfo) -> SystemInfo {
    match read_memory_info() {
        Some(memory) => merge_memory(static_info, &memory),
        None => {
            debug!("Memory information unavailable");
            static_info.clone()
        }
    }
}

/// Pure merge of memory figures into a copy of `static_info`.
pub fn merge_memory(static_info: &SystemInfo, memory: &MemoryInfo) -> SystemInfo {
    let mut info = static_info.clone();
    info.insert(
        KEY_AVAILABLE_PHYSICAL_MEMORY.to_string(),
        memory.available_physical.to_string(),
    );
    info.insert(
        KEY_AVAILABLE_VIRTUAL_MEMORY.to_string(),
        memory.available_virtual.to_string(),
    );
    info.insert(
        KEY_TOTAL_PHYSICAL_MEMORY.to_string(),
        memory.total_physical.to_string(),
    );
    info
}

fn read_memory_info() -> Option<MemoryInfo> {
    std::fs::read_to_string("/proc/meminfo")
        .ok()
        .and_then(|content| parse_meminfo(&content))
}

/// Parses `/proc/meminfo`. Virtual memory available is `MemAvailable + SwapFree`.
pub fn parse_meminfo(content: &str) -> Option<MemoryInfo> {
    let field = |name: &str| -> Option<u64> {
        content
            .lines()
            .find(|line| line.split(':').next() == Some(name))
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|kb| kb.parse::<u64>().ok())
            .map(|kb| kb * 1024)
    };

    let total_physical = field("MemTotal")?;
    let available_physical = field("MemAvailable").or_else(|| field("MemFree"))?;
    let swap_free = field("SwapFree").unwrap_or(0);

    Some(MemoryInfo {
        total_physical,
        available_physical,
        available_virtual: available_physical + swap_free,
    })
}
