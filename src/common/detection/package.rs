//! ZIP package detection: EPUB, DAISY, DAISY-Audio and Word (OOXML).

use tracing::trace;

use super::types::FormatType;
use crate::container::ZipContainer;

/// MIME type an EPUB declares in its leading `mimetype` entry.
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

/// Entry extension that marks a DAISY book as carrying audio.
pub const AUDIO_EXTENSION: &str = ".mp3";

/// Pick between DAISY and DAISY-Audio.
///
/// Any `.mp3` entry anywhere in the package makes it DAISY-Audio. This is an
/// approximation: a text book with an incidental audio clip is classified as
/// an audio book.
pub fn daisy_variant(container: &ZipContainer) -> FormatType {
    if container.has_extension(AUDIO_EXTENSION) {
        FormatType::DaisyAudio
    } else {
        FormatType::Daisy
    }
}

/// Identify the format of an opened ZIP package from its entries.
pub fn detect_package_format(container: &mut ZipContainer) -> Option<FormatType> {
    if let Some(mimetype) = container.read_string("mimetype", false)
        && mimetype.trim() == EPUB_MIMETYPE
    {
        trace!("mimetype entry declares EPUB");
        return Some(FormatType::Epub);
    }

    let names = container.names();
    let has = |path: &str| names.iter().any(|name| name == path);
    if has("[Content_Types].xml") && (has("word/document.xml") || has("docProps/core.xml")) {
        trace!("OOXML content types with a word part");
        return Some(FormatType::Word);
    }

    if container.has_extension(".opf") || container.has_extension(".ncx") {
        return Some(daisy_variant(container));
    }

    None
}
