//! Value types shared by the remote client and the web front end: the two
//! language catalogues, captured and inline audio, and WAV helpers for the
//! in-page recorder.

pub mod audio;
pub mod language;
pub mod wav;

pub use audio::{
    is_accepted_audio_upload, is_accepted_text_upload, AudioSource, CapturedAudio, InlineAudio,
};
pub use language::{TargetLanguage, TtsLanguage, UnknownLanguage};
pub use wav::WavInfo;
