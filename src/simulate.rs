//! Simulated network activity
//!
//! Nothing here touches the network. Files are only inspected for their
//! metadata, fingerprints and invite codes are random strings, and transfer
//! progress is advanced from the transfer's nominal speed.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::path::Path;
use std::time::Duration;

use crate::messages::actions::TransferUpdate;
use crate::models::{Peer, Transfer, TransferKind, TransferStatus};

const HEX: &[u8] = b"0123456789abcdef";
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_string<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Metadata of a local file offered for upload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    pub media_type: String,
}

impl FileMeta {
    /// Inspect a file without reading its contents
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata =
            std::fs::metadata(path).with_context(|| format!("reading {}", path.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("{} is not a file", path.display());
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .with_context(|| format!("{} has no file name", path.display()))?;
        let media_type = media_label(&name).to_string();
        Ok(FileMeta {
            name,
            size: metadata.len(),
            media_type,
        })
    }
}

/// Human label for a file, chosen by extension
pub fn media_label(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "bmp" => "Image",
        "mp4" | "mkv" | "avi" | "mov" | "webm" => "Video",
        "mp3" | "flac" | "wav" | "ogg" | "m4a" => "Audio",
        "pdf" | "doc" | "docx" | "txt" | "md" | "epub" | "odt" => "Document",
        "zip" | "rar" | "7z" | "tar" | "gz" | "xz" | "bz2" => "Archive",
        "iso" | "img" => "ISO Image",
        "msi" | "exe" | "dmg" | "deb" | "rpm" | "pkg" => "Installer",
        _ => "File",
    }
}

pub fn is_torrent_file(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".torrent")
}

/// A stand-in for a SHA-256 content hash
pub fn fingerprint<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("sha256:{}", random_string(rng, HEX, 64))
}

/// Invite code such as `K3F9-ZQ1A-77PX`
pub fn share_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..3)
        .map(|_| random_string(rng, CODE_ALPHABET, 4))
        .collect::<Vec<_>>()
        .join("-")
}

/// Random transfer id not present in `existing`
pub fn transfer_id<R: Rng + ?Sized>(rng: &mut R, existing: &[Transfer]) -> String {
    loop {
        let id = random_string(rng, ID_ALPHABET, 9);
        if !existing.iter().any(|t| t.id == id) {
            return id;
        }
    }
}

/// A downloading transfer synthesised from a `.torrent` file name
pub fn torrent_transfer<R: Rng + ?Sized>(
    rng: &mut R,
    file_name: &str,
    existing: &[Transfer],
    now: DateTime<Utc>,
) -> Transfer {
    let trimmed = file_name.trim();
    let name = if is_torrent_file(trimmed) {
        trimmed[..trimmed.len() - ".torrent".len()].to_string()
    } else {
        trimmed.to_string()
    };
    Transfer {
        id: transfer_id(rng, existing),
        media_type: media_label(&name).to_string(),
        name,
        size: rng.gen_range(100_000_000..1_100_000_000),
        kind: TransferKind::Download,
        status: TransferStatus::Downloading,
        progress: rng.gen_range(0..50) as f64,
        speed: rng.gen_range(1_000_000..11_000_000),
        created_at: now,
        fingerprint: fingerprint(rng),
        seeds: rng.gen_range(1..21),
        peers: rng.gen_range(5..55),
    }
}

/// A pending upload for a local file
pub fn upload_transfer<R: Rng + ?Sized>(
    rng: &mut R,
    file: &FileMeta,
    existing: &[Transfer],
    now: DateTime<Utc>,
) -> Transfer {
    Transfer {
        id: transfer_id(rng, existing),
        name: file.name.clone(),
        size: file.size,
        media_type: file.media_type.clone(),
        kind: TransferKind::Upload,
        status: TransferStatus::Pending,
        progress: 0.0,
        speed: rng.gen_range(1_000_000..8_000_000),
        created_at: now,
        fingerprint: fingerprint(rng),
        seeds: 0,
        peers: 0,
    }
}

/// The peer an invite code resolves to, stored under `id`
pub fn peer_from_invite<R: Rng + ?Sized>(
    rng: &mut R,
    code: &str,
    id: String,
    now: DateTime<Utc>,
) -> Peer {
    let prefix: String = code.trim().chars().take(4).collect();
    Peer {
        id,
        username: format!("User_{}", prefix),
        trust_score: rng.gen_range(50..100),
        last_seen: now,
        is_online: rng.gen_bool(0.5),
        is_blocked: false,
    }
}

/// Outcome of advancing one transfer by a tick
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Still running at the new percentage
    Progress(f64),
    /// Reached 100%
    Finished,
}

/// How far a transfer moves in `elapsed` at its nominal speed. `None` when
/// the transfer is not running.
pub fn advance(transfer: &Transfer, elapsed: Duration) -> Option<Advance> {
    let running = match transfer.status {
        TransferStatus::Downloading | TransferStatus::Uploading => !transfer.is_finished(),
        _ => false,
    };
    if !running || transfer.speed == 0 {
        return None;
    }
    if transfer.size == 0 {
        return Some(Advance::Finished);
    }
    let step = transfer.speed as f64 * elapsed.as_secs_f64() * 100.0 / transfer.size as f64;
    let progress = transfer.progress + step;
    if progress >= 100.0 {
        Some(Advance::Finished)
    } else {
        Some(Advance::Progress(progress))
    }
}

/// Field changes that mark a transfer as finished
pub fn finish_changes(transfer: &Transfer) -> Vec<TransferUpdate> {
    match transfer.kind {
        TransferKind::Download => vec![
            TransferUpdate::Status(TransferStatus::Completed),
            TransferUpdate::Speed(0),
        ],
        // Finished uploads keep seeding.
        _ => vec![TransferUpdate::Progress(100.0), TransferUpdate::Speed(0)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use tempfile::tempdir;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn running(status: TransferStatus, progress: f64, speed: u64, size: u64) -> Transfer {
        Transfer {
            id: String::from("t"),
            name: String::from("x.zip"),
            size,
            media_type: String::from("Archive"),
            kind: if status == TransferStatus::Uploading {
                TransferKind::Upload
            } else {
                TransferKind::Download
            },
            status,
            progress,
            speed,
            created_at: Utc::now(),
            fingerprint: String::new(),
            seeds: 0,
            peers: 0,
        }
    }

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint(&mut rng());
        let hex = fp.strip_prefix("sha256:").unwrap();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_share_code_shape() {
        let code = share_code(&mut rng());
        let groups: Vec<_> = code.split('-').collect();
        assert_eq!(groups.len(), 3);
        assert!(groups
            .iter()
            .all(|g| g.len() == 4 && g.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())));
    }

    #[test]
    fn test_media_label() {
        assert_eq!(media_label("Ubuntu.ISO"), "ISO Image");
        assert_eq!(media_label("photo.jpeg"), "Image");
        assert_eq!(media_label("notes"), "File");
    }

    #[test]
    fn test_file_meta_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        fs::write(&path, b"12345").unwrap();

        let meta = FileMeta::from_path(&path).unwrap();
        assert_eq!(meta.name, "report.pdf");
        assert_eq!(meta.size, 5);
        assert_eq!(meta.media_type, "Document");

        assert!(FileMeta::from_path(dir.path()).is_err());
        assert!(FileMeta::from_path(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_torrent_transfer_strips_extension() {
        let t = torrent_transfer(&mut rng(), "debian.iso.torrent", &[], Utc::now());
        assert_eq!(t.name, "debian.iso");
        assert_eq!(t.status, TransferStatus::Downloading);
        assert_eq!(t.kind, TransferKind::Download);
        assert!(t.progress < 50.0);
        assert!(t.speed >= 1_000_000);
        assert!((1..21).contains(&t.seeds));
        assert!((5..55).contains(&t.peers));
    }

    #[test]
    fn test_invite_peer_shape() {
        let first = peer_from_invite(&mut rng(), "ABCD-1234", String::from("peer_1"), Utc::now());
        assert_eq!(first.id, "peer_1");
        assert_eq!(first.username, "User_ABCD");
        assert!((50..100).contains(&first.trust_score));
        assert!(!first.is_blocked);
    }

    #[test]
    fn test_advance_moves_by_speed() {
        let t = running(TransferStatus::Downloading, 10.0, 100, 1000);
        assert_eq!(advance(&t, Duration::from_secs(1)), Some(Advance::Progress(20.0)));
        assert_eq!(advance(&t, Duration::from_secs(9)), Some(Advance::Finished));
    }

    #[test]
    fn test_advance_ignores_idle_transfers() {
        let paused = running(TransferStatus::Paused, 10.0, 100, 1000);
        assert_eq!(advance(&paused, Duration::from_secs(1)), None);
        let seeding = running(TransferStatus::Uploading, 100.0, 100, 1000);
        assert_eq!(advance(&seeding, Duration::from_secs(1)), None);
    }

    #[test]
    fn test_finished_upload_keeps_seeding() {
        let up = running(TransferStatus::Uploading, 90.0, 100, 1000);
        assert!(!finish_changes(&up).contains(&TransferUpdate::Status(TransferStatus::Completed)));
        let down = running(TransferStatus::Downloading, 90.0, 100, 1000);
        assert!(finish_changes(&down).contains(&TransferUpdate::Status(TransferStatus::Completed)));
    }
}
