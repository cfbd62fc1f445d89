//! Built-in icon registry and alias table.
//!
//! Local entries are 24×24 stroke paths (Lucide geometry) drawn with a 2-unit
//! round stroke. Remote entries name a `collection:name` lookup key on the
//! configured icon host.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Where a registered icon's glyph comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSource {
    /// Inline 24×24 path data.
    Path(&'static str),
    /// Lookup key for the remote icon host.
    Remote(&'static str),
}

/// The "circle-help" mark used when resolution fails.
pub const FALLBACK_PATH: &str =
    "M12 22a10 10 0 1 1 0-20 10 10 0 0 1 0 20zM9.09 9a3 3 0 0 1 5.83 1c0 2-3 3-3 3M12 17h.01";

/// Side of the square path coordinate space.
pub const PATH_VIEWBOX: f32 = 24.0;

const ENTRIES: &[(&str, IconSource)] = &[
    ("link", IconSource::Path("M10 13a5 5 0 0 0 7.54.54l3-3a5 5 0 0 0-7.07-7.07l-1.72 1.71M14 11a5 5 0 0 0-7.54-.54l-3 3a5 5 0 0 0 7.07 7.07l1.71-1.71")),
    ("upload", IconSource::Path("M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4M17 8l-5-5-5 5M12 3v12")),
    ("download", IconSource::Path("M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4M7 10l5 5 5-5M12 15V3")),
    ("file", IconSource::Path("M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8zM14 2v6h6M16 13H8M16 17H8M10 9H8")),
    ("code", IconSource::Path("m18 16 4-4-4-4M6 8l-4 4 4 4M14 4l-4 16")),
    ("gamepad", IconSource::Path("M6 12h4M8 10v4M15 13h.01M18 11h.01M17.32 5H6.68a4 4 0 0 0-3.978 3.59c-.006.052-.01.101-.017.152C2.604 9.416 2 14.456 2 16a3 3 0 0 0 3 3c1 0 1.5-.5 2-1l1.414-1.414A2 2 0 0 1 9.828 16h4.344a2 2 0 0 1 1.414.586L17 18c.5.5 1 1 2 1a3 3 0 0 0 3-3c0-1.545-.604-6.584-.685-7.258-.007-.05-.011-.1-.017-.151A4 4 0 0 0 17.32 5z")),
    ("cpu", IconSource::Path("M18 12h2M4 12h2M12 4v2M12 18v2M17 7l1.4-1.4M5.6 18.4L7 17M17 17l1.4 1.4M5.6 5.6L7 7M9 9h6v6H9z")),
    ("globe", IconSource::Path("M22 12a10 10 0 1 1-20 0 10 10 0 0 1 20 0zM2 12h20M12 2a15.3 15.3 0 0 1 4 10 15.3 15.3 0 0 1-4 10 15.3 15.3 0 0 1-4-10 15.3 15.3 0 0 1 4-10z")),
    ("zap", IconSource::Path("M13 2L3 14h9l-1 8 10-12h-9l1-8z")),
    ("shield", IconSource::Path("M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z")),
    ("clock", IconSource::Path("M12 22a10 10 0 1 1 0-20 10 10 0 0 1 0 20zM12 6v6l4 2")),
    ("terminal", IconSource::Path("m4 17 6-6-6-6M12 19h8")),
    ("sparkles", IconSource::Path("m12 3-1.912 5.813a2 2 0 0 1-1.275 1.275L3 12l5.813 1.912a2 2 0 0 1 1.275 1.275L12 21l1.912-5.813a2 2 0 0 1 1.275-1.275L21 12l-5.813-1.912a2 2 0 0 1-1.275-1.275L12 3Z")),
    ("monitor", IconSource::Path("M4 6a2 2 0 0 1 2-2h12a2 2 0 0 1 2 2v7a2 2 0 0 1-2 2H6a2 2 0 0 1-2-2V6zM8 21h8M12 17v4")),
    ("box", IconSource::Path("M21 8a2 2 0 0 0-1-1.73l-7-4a2 2 0 0 0-2 0l-7 4A2 2 0 0 0 3 8v8a2 2 0 0 0 1 1.73l7 4a2 2 0 0 0 2 0l7-4A2 2 0 0 0 21 16Z M3.3 7l8.7 5 8.7-5 M12 22V12")),
    ("layers", IconSource::Path("m12.83 2.18a2 2 0 0 0-1.66 0L2.6 6.08a1 1 0 0 0 0 1.83l8.58 3.91a2 2 0 0 0 1.66 0l8.58-3.9a1 1 0 0 0 0-1.83Z M22 12.65l-8.58 3.9a2 2 0 0 1-1.66 0L3.18 12.65 M22 17.65l-8.58 3.9a2 2 0 0 1-1.66 0L3.18 17.65")),
    ("calculator", IconSource::Path("M4 2h16a2 2 0 0 1 2 2v16a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2V4a2 2 0 0 1 2-2zM6 6h12M6 12h2M6 18h2M12 12h2M12 18h2M18 12h2M18 18h2")),
    ("image", IconSource::Path("M19 3H5a2 2 0 0 0-2 2v14a2 2 0 0 0 2 2h14a2 2 0 0 0 2-2V5a2 2 0 0 0-2-2zM8.5 10a1.5 1.5 0 1 1 0-3 1.5 1.5 0 0 1 0 3zM21 15l-5-5L5 21")),
    ("rocket", IconSource::Path("M4.5 16.5c-1.5 1.26-2 5-2 5s3.74-.5 5-2c.71-.84.7-2.13-.09-2.91a2.18 2.18 0 0 0-2.91-.09zM12 15l-3-3a22 22 0 0 1 2-3.95A12.88 12.88 0 0 1 22 2c0 2.72-.78 7.5-6 11a22.35 22.35 0 0 1-4 2zM9 12H4s.55-3.03 2-4c1.62-1.08 5 0 5 0M12 15v5s3.03-.55 4-2c1.08-1.62 0-5 0-5")),
    ("heart", IconSource::Path("M19 14c1.49-1.46 3-3.21 3-5.5A5.5 5.5 0 0 0 16.5 3c-1.76 0-3 .5-4.5 2-1.5-1.5-2.74-2-4.5-2A5.5 5.5 0 0 0 2 8.5c0 2.3 1.5 4.05 3 5.5l7 7Z")),
    ("star", IconSource::Path("M12 2l3.09 6.26L22 9.27l-5 4.87 1.18 6.88L12 17.77l-6.18 3.25L7 14.14 2 9.27l6.91-1.01L12 2z")),
    ("book", IconSource::Path("M4 19.5A2.5 2.5 0 0 1 6.5 17H20M6.5 2H20v20H6.5A2.5 2.5 0 0 1 4 19.5v-15A2.5 2.5 0 0 1 6.5 2z")),
    ("music", IconSource::Path("M9 18V5l12-2v13M9 18a3 3 0 1 1-6 0 3 3 0 0 1 6 0zM21 16a3 3 0 1 1-6 0 3 3 0 0 1 6 0z")),
    ("camera", IconSource::Path("M14.5 4h-5L7 7H4a2 2 0 0 0-2 2v9a2 2 0 0 0 2 2h16a2 2 0 0 0 2-2V9a2 2 0 0 0-2-2h-3l-2.5-3zM12 17a4 4 0 1 0 0-8 4 4 0 0 0 0 8z")),
    ("mail", IconSource::Path("M4 4h16a2 2 0 0 1 2 2v12a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2V6a2 2 0 0 1 2-2zM22 6l-10 7L2 6")),
    ("user", IconSource::Path("M19 21v-2a4 4 0 0 0-4-4H9a4 4 0 0 0-4 4v2M12 11a4 4 0 1 0 0-8 4 4 0 0 0 0 8z")),
    ("sliders", IconSource::Path("M4 21v-7M4 10V3M12 21v-9M12 8V3M20 21v-5M20 12V3M1 14h6M9 8h6M17 16h6")),
    ("database", IconSource::Path("M12 8c4.97 0 9-1.34 9-3s-4.03-3-9-3-9 1.34-9 3 4.03 3 9 3zM21 12c0 1.66-4 3-9 3s-9-1.34-9-3M3 5v14c0 1.66 4 3 9 3s9-1.34 9-3V5")),
    ("server", IconSource::Path("M4 2h16a2 2 0 0 1 2 2v4a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2V4a2 2 0 0 1 2-2zM4 14h16a2 2 0 0 1 2 2v4a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2v-4a2 2 0 0 1 2-2zM6 6h.01M6 18h.01")),
    ("cloud", IconSource::Path("M17.5 19H9a7 7 0 1 1 6.71-9h1.79a4.5 4.5 0 1 1 0 9Z")),
    ("lock", IconSource::Path("M5 11h14a2 2 0 0 1 2 2v7a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-7a2 2 0 0 1 2-2zM7 11V7a5 5 0 0 1 10 0v4")),
    ("key", IconSource::Path("M21 2l-2 2m-7.61 7.61a5.5 5.5 0 1 1-7.778 7.778 5.5 5.5 0 0 1 7.777-7.777zm0 0L15.5 7.5m0 0l3 3L22 7l-3-3m-3.5 3.5L19 4")),
    ("search", IconSource::Path("M11 19a8 8 0 1 0 0-16 8 8 0 0 0 0 16zM21 21l-4.35-4.35")),
    ("home", IconSource::Path("M3 9l9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2zM9 22V12h6v10")),
    ("folder", IconSource::Path("M22 19a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h5l2 3h9a2 2 0 0 1 2 2z")),
    ("git-branch", IconSource::Path("M6 3v12M18 9a3 3 0 1 0 0-6 3 3 0 0 0 0 6zM6 21a3 3 0 1 0 0-6 3 3 0 0 0 0 6zM18 9a9 9 0 0 1-9 9")),
    ("coffee", IconSource::Path("M18 8h1a4 4 0 0 1 0 8h-1M2 8h16v9a4 4 0 0 1-4 4H6a4 4 0 0 1-4-4V8zM6 1v3M10 1v3M14 1v3")),
    ("flame", IconSource::Path("M8.5 14.5A2.5 2.5 0 0 0 11 12c0-1.38-.5-2-1-3-1.072-2.143-.224-4.054 2-6 .5 2.5 2 4.9 4 6.5 2 1.6 3 3.5 3 5.5a7 7 0 1 1-14 0c0-1.153.433-2.294 1-3a2.5 2.5 0 0 0 2.5 2.5z")),
    ("bot", IconSource::Path("M12 8V4H8M4 8h16a2 2 0 0 1 2 2v8a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2v-8a2 2 0 0 1 2-2zM2 14h2M20 14h2M15 13v2M9 13v2")),
    ("wifi", IconSource::Path("M5 12.55a11 11 0 0 1 14.08 0M1.42 9a16 16 0 0 1 21.16 0M8.53 16.11a6 6 0 0 1 6.95 0M12 20h.01")),
    ("bell", IconSource::Path("M6 8a6 6 0 0 1 12 0c0 7 3 9 3 9H3s3-2 3-9M10.3 21a1.94 1.94 0 0 0 3.4 0")),
    ("calendar", IconSource::Path("M5 4h14a2 2 0 0 1 2 2v14a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V6a2 2 0 0 1 2-2zM16 2v4M8 2v4M3 10h18")),
    ("chart", IconSource::Path("M12 20V10M18 20V4M6 20v-4")),
    ("pencil", IconSource::Path("M17 3a2.85 2.83 0 1 1 4 4L7.5 20.5 2 22l1.5-5.5Z")),
    ("message", IconSource::Path("M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z")),
    ("hash", IconSource::Path("M4 9h16M4 15h16M10 3L8 21M16 3l-2 18")),
    ("help", IconSource::Path(FALLBACK_PATH)),
    ("github", IconSource::Remote("simple-icons:github")),
    ("gitlab", IconSource::Remote("simple-icons:gitlab")),
    ("discord", IconSource::Remote("simple-icons:discord")),
    ("x", IconSource::Remote("simple-icons:x")),
    ("youtube", IconSource::Remote("simple-icons:youtube")),
    ("twitch", IconSource::Remote("simple-icons:twitch")),
    ("reddit", IconSource::Remote("simple-icons:reddit")),
    ("bluesky", IconSource::Remote("simple-icons:bluesky")),
    ("spotify", IconSource::Remote("simple-icons:spotify")),
    ("rust", IconSource::Remote("simple-icons:rust")),
    ("typescript", IconSource::Remote("simple-icons:typescript")),
    ("react", IconSource::Remote("simple-icons:react")),
    ("nextjs", IconSource::Remote("simple-icons:nextdotjs")),
    ("vercel", IconSource::Remote("simple-icons:vercel")),
    ("docker", IconSource::Remote("simple-icons:docker")),
    ("npm", IconSource::Remote("simple-icons:npm")),
    ("linux", IconSource::Remote("simple-icons:linux")),
];

/// Legacy, kebab-case and lower-cased PascalCase names → canonical key.
const ALIASES: &[(&str, &str)] = &[
    ("link2", "link"),
    ("link-2", "link"),
    ("url", "link"),
    ("uploadcloud", "upload"),
    ("upload-cloud", "upload"),
    ("downloadcloud", "download"),
    ("filetext", "file"),
    ("file-text", "file"),
    ("document", "file"),
    ("code2", "code"),
    ("code-2", "code"),
    ("codexml", "code"),
    ("code-xml", "code"),
    ("game", "gamepad"),
    ("gamepad2", "gamepad"),
    ("gamepad-2", "gamepad"),
    ("chip", "cpu"),
    ("processor", "cpu"),
    ("world", "globe"),
    ("earth", "globe"),
    ("web", "globe"),
    ("bolt", "zap"),
    ("lightning", "zap"),
    ("shieldcheck", "shield"),
    ("shield-check", "shield"),
    ("security", "shield"),
    ("time", "clock"),
    ("clock3", "clock"),
    ("squareterminal", "terminal"),
    ("square-terminal", "terminal"),
    ("console", "terminal"),
    ("shell", "terminal"),
    ("cli", "terminal"),
    ("sparkle", "sparkles"),
    ("magic", "sparkles"),
    ("ai", "sparkles"),
    ("screen", "monitor"),
    ("display", "monitor"),
    ("package", "box"),
    ("stack", "layers"),
    ("layers3", "layers"),
    ("layers-3", "layers"),
    ("calc", "calculator"),
    ("photo", "image"),
    ("picture", "image"),
    ("launch", "rocket"),
    ("love", "heart"),
    ("favorite", "heart"),
    ("bookopen", "book"),
    ("book-open", "book"),
    ("docs", "book"),
    ("email", "mail"),
    ("envelope", "mail"),
    ("person", "user"),
    ("profile", "user"),
    ("settings", "sliders"),
    ("slidershorizontal", "sliders"),
    ("sliders-horizontal", "sliders"),
    ("db", "database"),
    ("padlock", "lock"),
    ("find", "search"),
    ("house", "home"),
    ("directory", "folder"),
    ("gitbranch", "git-branch"),
    ("branch", "git-branch"),
    ("git", "git-branch"),
    ("fire", "flame"),
    ("robot", "bot"),
    ("notification", "bell"),
    ("date", "calendar"),
    ("barchart", "chart"),
    ("bar-chart", "chart"),
    ("chartbar", "chart"),
    ("pen", "pencil"),
    ("edit", "pencil"),
    ("chat", "message"),
    ("messagesquare", "message"),
    ("message-square", "message"),
    ("circlehelp", "help"),
    ("circle-help", "help"),
    ("helpcircle", "help"),
    ("help-circle", "help"),
    ("question", "help"),
    ("twitter", "x"),
    ("next", "nextjs"),
    ("next.js", "nextjs"),
    ("ts", "typescript"),
    ("rustlang", "rust"),
];

static REGISTRY: LazyLock<HashMap<&'static str, IconSource>> =
    LazyLock::new(|| ENTRIES.iter().copied().collect());

static ALIAS_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ALIASES.iter().copied().collect());

/// Normalizes a user-supplied key: trimmed, lower-cased, alias-resolved.
pub fn canonical_key(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let stripped = lowered
        .strip_prefix("lucide:")
        .or_else(|| lowered.strip_prefix("lucide-"))
        .unwrap_or(lowered.as_str());
    match ALIAS_TABLE.get(stripped) {
        Some(canonical) => (*canonical).to_string(),
        None => stripped.to_string(),
    }
}

/// Looks up a canonical key.
pub fn lookup(canonical: &str) -> Option<IconSource> {
    REGISTRY.get(canonical).copied()
}

/// Registered canonical keys, in declaration order.
pub fn icon_keys() -> impl Iterator<Item = &'static str> {
    ENTRIES.iter().map(|(key, _)| *key)
}
