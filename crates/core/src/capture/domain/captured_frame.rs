use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Encoded container formats for snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotFormat {
    Png,
}

impl SnapshotFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            SnapshotFormat::Png => "image/png",
        }
    }
}

/// An immutable still snapshot taken from a live video frame.
///
/// Dimensions are those of the live frame at capture time. Discarded as a
/// whole on retake; never modified in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedFrame {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    format: SnapshotFormat,
}

impl CapturedFrame {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32, format: SnapshotFormat) -> Self {
        Self {
            bytes,
            width,
            height,
            format,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    /// `data:<mime>;base64,<payload>`, the wire form the file-write
    /// endpoint expects.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime(),
            STANDARD.encode(&self.bytes)
        )
    }
}
