//! Append-only ARIS recording file writer.
//!
//! Layout: one 1024-byte file header, followed by `N` pairs of (1024-byte
//! frame header, `beams × samplesPerBeam` sample bytes). A half-written
//! file (created but never given a frame) is deleted on drop.

use std::{
    fs::File,
    io::{Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use aris_proto::{ArisFileHeader, ArisFrameHeader};

use crate::{error::RecordingError, ping_mode::PingMode};

/// Writes frames to an ARIS recording file.
pub struct RecordingWriter {
    file: File,
    path: PathBuf,
    file_header: ArisFileHeader,
    frame_count: u32,
}

impl RecordingWriter {
    /// Create a new recording at `path`, overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Open`] if the file cannot be created or the
    /// zero-initialized file header cannot be written; on the latter the
    /// partially created file is removed before returning.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, RecordingError> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::create(&path).map_err(RecordingError::Open)?;
        let file_header = ArisFileHeader::new();

        if let Err(err) = file.write_all(&file_header.to_bytes()) {
            drop(file);
            let _ = std::fs::remove_file(&path);
            return Err(RecordingError::Open(err));
        }

        Ok(Self { file, path, file_header, frame_count: 0 })
    }

    /// Append a frame: a 1024-byte header followed by sample bytes.
    ///
    /// `header.frame_index` is overridden with the zero-based index this
    /// writer assigns, so callers need not track a gap-free sequence
    /// themselves.
    ///
    /// On any write failure partway through, the file position is rewound
    /// to the start of this frame (the end of the last successfully
    /// written one), logically truncating the partial write; `frame_count`
    /// and the in-memory file-header state are left unchanged so a retried
    /// call picks up from the same known-good boundary.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::Write`] or [`RecordingError::Seek`] on any
    /// I/O failure.
    pub fn write_frame(&mut self, mut header: ArisFrameHeader, samples: &[u8]) -> Result<(), RecordingError> {
        let start = self.file.stream_position().map_err(RecordingError::Seek)?;

        #[allow(clippy::cast_possible_wrap)]
        header.set_frame_index(self.frame_count as i32);
        let is_first_frame = self.frame_count == 0;
        let mut file_header = self.file_header;

        let result = self.try_write_frame(&header, samples, is_first_frame, &mut file_header);

        match result {
            Ok(()) => {
                self.file_header = file_header;
                self.frame_count += 1;
                Ok(())
            },
            Err(err) => {
                let _ = self.file.seek(SeekFrom::Start(start));
                Err(err)
            },
        }
    }

    fn try_write_frame(
        &mut self,
        header: &ArisFrameHeader,
        samples: &[u8],
        is_first_frame: bool,
        file_header: &mut ArisFileHeader,
    ) -> Result<(), RecordingError> {
        self.file.write_all(&header.to_bytes())?;

        if is_first_frame {
            let beams = PingMode::from_raw(header.ping_mode()).map_or(0, PingMode::beams);
            file_header.set_samples_per_channel(header.samples_per_beam());
            file_header.set_num_raw_beams(beams);
            file_header.set_sn(header.sonar_serial_number());
            Self::patch_file_header(&mut self.file, file_header)?;
        }

        self.file.write_all(samples)?;

        file_header.set_frame_count(self.frame_count + 1);
        Self::patch_file_header(&mut self.file, file_header)?;

        Ok(())
    }

    /// How many frames have been written so far.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    fn patch_file_header(file: &mut File, file_header: &ArisFileHeader) -> Result<(), RecordingError> {
        let resume_pos = file.stream_position().map_err(RecordingError::Seek)?;
        file.seek(SeekFrom::Start(0)).map_err(RecordingError::Seek)?;
        file.write_all(&file_header.to_bytes())?;
        file.seek(SeekFrom::Start(resume_pos)).map_err(RecordingError::Seek)?;
        Ok(())
    }
}

impl Drop for RecordingWriter {
    fn drop(&mut self) {
        if self.frame_count == 0 {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
