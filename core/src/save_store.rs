//! Crash-recovery persistence
//!
//! [`SaveState`] keeps the 20-byte [`SaveRecord`] in memory and mirrors it to
//! a [`SaveDevice`] on every save. Device errors are logged and absorbed, and
//! a record that fails validation is replaced with a fresh one.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use partybox_shared::{
    AiDifficulty, CONTROLLER_PORTS, MAX_MINIGAMES, MAX_PLAYERS, MAX_POINTS_TO_WIN,
    MIN_POINTS_TO_WIN, NextRound, SaveRecord,
};

use crate::roster::PlayerRoster;
use crate::tournament::Tournament;

/// Byte stored in the chooser field when nobody picks the next minigame.
pub const NO_CHOOSER: u8 = u8::MAX;

/// Non-volatile memory holding the save record.
pub trait SaveDevice {
    /// Read back the stored image. A device that was never written returns
    /// an empty buffer.
    fn read(&mut self) -> io::Result<Vec<u8>>;

    /// Replace the stored image.
    fn write(&mut self, data: &[u8]) -> io::Result<()>;
}

/// Save memory backed by a file on the host.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the target,
/// so a crash mid-write leaves the previous image intact.
#[derive(Debug, Clone)]
pub struct FileSaveDevice {
    path: PathBuf,
}

impl FileSaveDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn tmp_path(&self) -> io::Result<PathBuf> {
        match self.path.file_name() {
            Some(name) => {
                let mut tmp_name = OsString::from(name);
                tmp_name.push(".tmp");
                Ok(self.path.with_file_name(tmp_name))
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "save path has no file name",
            )),
        }
    }
}

impl SaveDevice for FileSaveDevice {
    fn read(&mut self) -> io::Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.tmp_path()?;
        {
            let mut f = fs::File::create(&tmp_path)?;
            f.write_all(data)?;
            f.sync_all()?;
        }

        #[cfg(windows)]
        {
            if self.path.exists() {
                // Windows rename fails if destination exists.
                fs::remove_file(&self.path)?;
            }
        }

        fs::rename(&tmp_path, &self.path)
    }
}

/// Save memory held in RAM.
///
/// Clones share the same buffer, so a clone kept aside sees everything the
/// engine wrote and can be handed to a fresh engine to simulate a reboot.
#[derive(Debug, Clone, Default)]
pub struct MemorySaveDevice {
    image: Rc<RefCell<Vec<u8>>>,
}

impl MemorySaveDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(bytes: &[u8]) -> Self {
        Self {
            image: Rc::new(RefCell::new(bytes.to_vec())),
        }
    }

    /// Copy of the current image.
    pub fn contents(&self) -> Vec<u8> {
        self.image.borrow().clone()
    }
}

impl SaveDevice for MemorySaveDevice {
    fn read(&mut self) -> io::Result<Vec<u8>> {
        Ok(self.image.borrow().clone())
    }

    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        let mut image = self.image.borrow_mut();
        image.clear();
        image.extend_from_slice(data);
        Ok(())
    }
}

/// Tournament progress captured for crash recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub player_count: u8,
    pub ai_difficulty: AiDifficulty,
    pub points_to_win: u8,
    pub points: [u8; MAX_PLAYERS],
    pub next_round: NextRound,
    pub chooser: Option<usize>,
    pub current_game: Option<usize>,
}

impl SessionSnapshot {
    pub fn capture(
        roster: &PlayerRoster,
        tournament: &Tournament,
        current_game: Option<usize>,
    ) -> Self {
        Self {
            player_count: roster.human_count() as u8,
            ai_difficulty: roster.ai_difficulty(),
            points_to_win: tournament.points_to_win(),
            points: tournament.all_points(),
            next_round: tournament.policy(),
            chooser: tournament.chooser(),
            current_game,
        }
    }

    /// Decode the snapshot fields of a record.
    ///
    /// Out-of-range values fall back to their defaults.
    fn from_record(record: &SaveRecord) -> Self {
        let ai_difficulty = AiDifficulty::try_from(record.ai_difficulty).unwrap_or_else(|e| {
            tracing::warn!("Save record: {}, using default", e);
            AiDifficulty::default()
        });
        let next_round = NextRound::try_from(record.next_round).unwrap_or_else(|e| {
            tracing::warn!("Save record: {}, using default", e);
            NextRound::default()
        });
        Self {
            player_count: record.player_count.min(CONTROLLER_PORTS as u8),
            ai_difficulty,
            points_to_win: record
                .points_to_win
                .clamp(MIN_POINTS_TO_WIN, MAX_POINTS_TO_WIN),
            points: record.points,
            next_round,
            chooser: Some(record.chooser as usize).filter(|&c| c < MAX_PLAYERS),
            current_game: Some(record.current_game as usize).filter(|&g| g < MAX_MINIGAMES),
        }
    }
}

/// The persisted tournament record and the device it lives on.
///
/// Without a device every operation only touches the in-memory record.
/// Device errors are logged and absorbed: persistence is best effort.
pub struct SaveState {
    device: Option<Box<dyn SaveDevice>>,
    record: SaveRecord,
}

impl SaveState {
    /// Load the record from `device`.
    ///
    /// A blank, truncated or corrupted image (wrong magic or checksum) is
    /// treated as a first run and replaced by a fresh record.
    pub fn open(device: Option<Box<dyn SaveDevice>>) -> Self {
        let mut state = Self {
            device,
            record: SaveRecord::fresh(),
        };
        state.load();
        state
    }

    /// A save state with no backing device.
    pub fn absent() -> Self {
        Self::open(None)
    }

    fn load(&mut self) {
        let Some(device) = self.device.as_mut() else {
            tracing::info!("No save memory fitted; progress will not persist");
            return;
        };

        let bytes = match device.read() {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to read save memory: {}", e);
                return;
            }
        };

        if bytes.is_empty() {
            tracing::debug!("Save memory blank, starting fresh");
            return;
        }

        match SaveRecord::from_bytes(&bytes) {
            Ok(record) => {
                tracing::debug!(
                    "Loaded save record (crashed: {}, blacklist: {:#010x})",
                    record.is_crashed(),
                    record.blacklist()
                );
                self.record = record;
            }
            Err(e) => {
                tracing::warn!("Discarding save record: {}", e);
            }
        }
    }

    /// Whether save memory is fitted.
    pub fn is_present(&self) -> bool {
        self.device.is_some()
    }

    /// Whether the previous session died mid-tournament.
    pub fn has_crashed(&self) -> bool {
        self.record.is_crashed()
    }

    pub fn record(&self) -> &SaveRecord {
        &self.record
    }

    /// Write the record to the device.
    ///
    /// With `full` the snapshot fields are captured and the crash flag is
    /// raised; otherwise only the configuration portion (blacklist) changes
    /// and the snapshot fields keep their last values.
    pub fn save(&mut self, full: bool, snapshot: &SessionSnapshot) {
        if full {
            let record = &mut self.record;
            record.crashed = 1;
            record.player_count = snapshot.player_count;
            record.ai_difficulty = snapshot.ai_difficulty as u8;
            record.points_to_win = snapshot.points_to_win;
            record.points = snapshot.points;
            record.next_round = snapshot.next_round as u8;
            record.chooser = snapshot.chooser.map_or(NO_CHOOSER, |c| c as u8);
            record.current_game = snapshot.current_game.map_or(0, |g| g as u8);
        }
        self.flush();
    }

    /// Mark the tournament as cleanly finished.
    pub fn clear_crash_flag(&mut self) {
        self.record.crashed = 0;
        self.flush();
    }

    fn flush(&mut self) {
        self.record.seal();
        let Some(device) = self.device.as_mut() else {
            return;
        };
        if let Err(e) = device.write(self.record.as_bytes()) {
            tracing::warn!("Failed to write save memory: {}", e);
        }
    }

    /// Blacklisted minigames, one bit per registry index.
    pub fn blacklist(&self) -> u32 {
        self.record.blacklist()
    }

    /// Replace the blacklist. Takes effect on the device at the next save.
    pub fn set_blacklist(&mut self, mask: u32) {
        self.record.set_blacklist(mask);
    }

    pub fn is_blacklisted(&self, game: usize) -> bool {
        game < MAX_MINIGAMES && self.blacklist() & (1 << game) != 0
    }

    /// The snapshot fields of the stored record.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_record(&self.record)
    }

    /// Apply the stored snapshot to the live session.
    ///
    /// The roster comes back as ports `0..player_count`. Returns the
    /// minigame that was being played.
    pub fn restore_into(
        &self,
        roster: &mut PlayerRoster,
        tournament: &mut Tournament,
    ) -> Option<usize> {
        let snapshot = self.snapshot();
        roster.set_active(std::array::from_fn(|port| {
            port < snapshot.player_count as usize
        }));
        roster.set_ai_difficulty(snapshot.ai_difficulty);
        tournament.set_points_to_win(snapshot.points_to_win);
        for (player, points) in snapshot.points.iter().enumerate() {
            tournament.set_points(player, *points);
        }
        tournament.set_policy(snapshot.next_round);
        tournament.set_chooser(snapshot.chooser);
        tracing::info!(
            "Restored tournament: {} human(s), points {:?}, policy {:?}",
            snapshot.player_count,
            snapshot.points,
            snapshot.next_round
        );
        snapshot.current_game
    }
}

impl std::fmt::Debug for SaveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveState")
            .field("present", &self.is_present())
            .field("record", &self.record)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partybox_shared::SAVE_RECORD_SIZE;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            player_count: 2,
            ai_difficulty: AiDifficulty::Hard,
            points_to_win: 5,
            points: [1, 3, 0, 2],
            next_round: NextRound::RoundRobin,
            chooser: Some(1),
            current_game: Some(3),
        }
    }

    fn open(device: &MemorySaveDevice) -> SaveState {
        SaveState::open(Some(Box::new(device.clone())))
    }

    #[test]
    fn blank_device_starts_fresh() {
        let device = MemorySaveDevice::new();
        let state = open(&device);
        assert!(state.is_present());
        assert!(!state.has_crashed());
        assert_eq!(state.blacklist(), 0);
        assert!(device.contents().is_empty());
    }

    #[test]
    fn full_save_raises_crash_flag_and_persists() {
        let device = MemorySaveDevice::new();
        let mut state = open(&device);
        state.save(true, &snapshot());

        let bytes = device.contents();
        assert_eq!(bytes.len(), SAVE_RECORD_SIZE);
        assert_eq!(&bytes[..4], b"NBGJ");

        let reopened = open(&device);
        assert!(reopened.has_crashed());
        assert_eq!(reopened.snapshot(), snapshot());
    }

    #[test]
    fn config_save_keeps_snapshot_fields() {
        let device = MemorySaveDevice::new();
        let mut state = open(&device);
        state.save(true, &snapshot());

        let mut other = snapshot();
        other.points = [7, 7, 7, 7];
        state.set_blacklist(0b101);
        state.save(false, &other);

        let reopened = open(&device);
        assert_eq!(reopened.snapshot().points, [1, 3, 0, 2]);
        assert_eq!(reopened.blacklist(), 0b101);
        assert!(reopened.has_crashed());
    }

    #[test]
    fn clear_crash_flag_is_persisted() {
        let device = MemorySaveDevice::new();
        let mut state = open(&device);
        state.save(true, &snapshot());
        state.clear_crash_flag();
        assert!(!open(&device).has_crashed());
    }

    #[test]
    fn corrupted_image_is_replaced_by_fresh_record() {
        let device = MemorySaveDevice::new();
        let mut state = open(&device);
        state.set_blacklist(0xFF);
        state.save(true, &snapshot());

        let mut bytes = device.contents();
        bytes[12] ^= 0x10;
        let corrupted = MemorySaveDevice::with_contents(&bytes);
        let reopened = open(&corrupted);
        assert!(!reopened.has_crashed());
        assert_eq!(reopened.blacklist(), 0);
    }

    #[test]
    fn wrong_magic_is_first_run() {
        let device = MemorySaveDevice::with_contents(&[0xAB; SAVE_RECORD_SIZE]);
        let state = open(&device);
        assert_eq!(*state.record(), SaveRecord::fresh());
    }

    #[test]
    fn absent_device_is_a_no_op() {
        let mut state = SaveState::absent();
        assert!(!state.is_present());
        state.save(true, &snapshot());
        assert!(state.has_crashed());
        state.clear_crash_flag();
        assert!(!state.has_crashed());
    }

    #[test]
    fn blacklist_bits_round_trip() {
        let device = MemorySaveDevice::new();
        let mut state = open(&device);
        state.set_blacklist((1 << 0) | (1 << 31));
        state.save(false, &snapshot());
        let reopened = open(&device);
        assert!(reopened.is_blacklisted(0));
        assert!(reopened.is_blacklisted(31));
        assert!(!reopened.is_blacklisted(1));
        assert!(!reopened.is_blacklisted(40));
    }

    #[test]
    fn no_chooser_round_trips() {
        let device = MemorySaveDevice::new();
        let mut state = open(&device);
        let mut snap = snapshot();
        snap.chooser = None;
        state.save(true, &snap);
        assert_eq!(open(&device).record().chooser, NO_CHOOSER);
        assert_eq!(open(&device).snapshot().chooser, None);
    }

    #[test]
    fn restore_applies_snapshot() {
        let device = MemorySaveDevice::new();
        let mut state = open(&device);
        state.save(true, &snapshot());

        let mut roster = PlayerRoster::new();
        let mut tournament = Tournament::new();
        let game = open(&device).restore_into(&mut roster, &mut tournament);

        assert_eq!(game, Some(3));
        assert_eq!(roster.enabled_ports(), [true, true, false, false]);
        assert_eq!(roster.ai_difficulty(), AiDifficulty::Hard);
        assert_eq!(tournament.points_to_win(), 5);
        assert_eq!(tournament.all_points(), [1, 3, 0, 2]);
        assert_eq!(tournament.policy(), NextRound::RoundRobin);
        assert_eq!(tournament.chooser(), Some(1));
    }

    #[test]
    fn invalid_enum_bytes_fall_back_to_defaults() {
        let mut record = SaveRecord::fresh();
        record.ai_difficulty = 9;
        record.next_round = 200;
        record.points_to_win = 0;
        record.seal();
        let device = MemorySaveDevice::with_contents(record.as_bytes());
        let snap = open(&device).snapshot();
        assert_eq!(snap.ai_difficulty, AiDifficulty::Medium);
        assert_eq!(snap.next_round, NextRound::LeastPoints);
        assert_eq!(snap.points_to_win, MIN_POINTS_TO_WIN);
    }

    #[test]
    fn file_device_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("partybox.eep");

        let mut state = SaveState::open(Some(Box::new(FileSaveDevice::new(&path))));
        state.set_blacklist(0b10);
        state.save(true, &snapshot());
        assert!(path.exists());
        assert!(!path.with_file_name("partybox.eep.tmp").exists());

        let reopened = SaveState::open(Some(Box::new(FileSaveDevice::new(&path))));
        assert!(reopened.has_crashed());
        assert_eq!(reopened.blacklist(), 0b10);
        assert_eq!(reopened.snapshot(), snapshot());
    }

    #[test]
    fn file_device_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut device = FileSaveDevice::new(dir.path().join("none.eep"));
        assert!(device.read().unwrap().is_empty());
    }

    #[test]
    fn truncated_file_is_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.eep");
        std::fs::write(&path, b"NBGJ\0\0").unwrap();
        let state = SaveState::open(Some(Box::new(FileSaveDevice::new(&path))));
        assert_eq!(*state.record(), SaveRecord::fresh());
    }
}
