use std::path::PathBuf;

pub fn data_dir() -> PathBuf {
    if let Some(bd) = directories::BaseDirs::new() {
        bd.data_dir().join("nooks")
    } else {
        PathBuf::from("./.local/share/nooks")
    }
}

pub fn state_dir() -> PathBuf {
    // Prefer XDG state dir when available; fall back to the data dir
    if let Some(bd) = directories::BaseDirs::new() {
        if let Some(sd) = bd.state_dir() {
            return sd.join("nooks");
        }
    }
    data_dir()
}

pub fn db_path() -> PathBuf {
    data_dir().join("nooks.db")
}

pub fn prefs_path() -> PathBuf {
    state_dir().join("last_viewed.toml")
}
