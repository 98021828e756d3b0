mod audio;
mod equalizer;
mod frequency;
mod scene;
mod settings;

pub use audio::{AudioBuffer, AudioFormat, SampleRate, MAX_CHANNELS};
pub use equalizer::{EqBandId, EqualizerSettings, EQ_BAND_COUNT, MAX_GAIN_DB, MIN_GAIN_DB};
pub use frequency::{FrequencyRange, HertzRange, RangePolicy, CANINE_HEARING_POLICY};
pub use scene::{Scene, SceneMood};
pub use settings::AudioSettings;
