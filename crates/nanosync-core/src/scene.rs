//! Scene dump frames.
//!
//! A scene dump arrives as a SysEx body wrapped in two envelopes:
//!
//! 1. [`KorgMessage`]: exclusive marker, channel byte, software project tag,
//!    format byte, function id / length byte, payload.
//! 2. [`DumpResponse`]: structure byte, 7-bit split data length, function
//!    id, bit-packed scene data.
//!
//! The unpacked data is a fixed, terminated [`SceneDump`] layout.

use crate::codec;
use crate::error::FrameError;

/// Vendor exclusive marker leading every device SysEx body.
pub const KORG_EXCLUSIVE: u8 = 0x42;
/// Software project tag identifying the control surface family.
pub const SOFTWARE_PROJECT: [u8; 4] = [0x00, 0x01, 0x13, 0x00];
/// Channel byte value meaning "use the global MIDI channel".
pub const INHERIT_CHANNEL: u8 = 0x10;

/// Number of fader groups on the surface.
pub const GROUP_COUNT: usize = 8;
/// Number of transport buttons.
pub const TRANSPORT_COUNT: usize = 11;

const CONTROL_RECORD_LEN: usize = 6;
const COMMON_LEN: usize = 3;
const GROUP_LEN: usize = 1 + 5 * CONTROL_RECORD_LEN;
const TRANSPORT_LEN: usize = 1 + TRANSPORT_COUNT * CONTROL_RECORD_LEN;
const CUSTOM_DAW_ASSIGN_LEN: usize = 10;
const RESERVED_LEN: usize = 15;

/// Length of the unpacked scene layout in bytes.
pub const SCENE_LEN: usize =
    COMMON_LEN + GROUP_COUNT * GROUP_LEN + TRANSPORT_LEN + CUSTOM_DAW_ASSIGN_LEN + RESERVED_LEN;

/// Packed scene length as sent by the device. The final group carries only
/// three payload bytes; the four it leaves out read as zero.
pub const PACKED_SCENE_LEN: usize = 388;

/// Packed length of the scene with every group complete.
const PACKED_SCENE_MAX: usize = SCENE_LEN.div_ceil(codec::NATURAL_GROUP) * codec::WIRE_GROUP;
/// Unpacked offset where the final packed group starts.
const LAST_GROUP_OFFSET: usize = (SCENE_LEN - 1) / codec::NATURAL_GROUP * codec::NATURAL_GROUP;

/// Build the "current scene data dump request" body for `channel`.
#[must_use]
pub fn scene_request(channel: u8) -> [u8; 9] {
    let [p0, p1, p2, p3] = SOFTWARE_PROJECT;
    [KORG_EXCLUSIVE, 0x40 | (channel & 0x0f), p0, p1, p2, p3, 0x1f, 0x10, 0x00]
}

/// Decode a complete scene dump from a SysEx body (without `F0`/`F7`).
///
/// # Errors
/// Returns a [`FrameError`] if any envelope or the scene layout does not match.
pub fn parse_scene_message(body: &[u8]) -> Result<SceneDump, FrameError> {
    let message = KorgMessage::parse(body)?;
    let response = DumpResponse::parse(&message.payload)?;
    SceneDump::parse(&unpack_scene_data(&response.data)?)
}

/// Unpack scene data, zero-filling a final group the device cut short.
fn unpack_scene_data(data: &[u8]) -> Result<Vec<u8>, FrameError> {
    if data.len() > PACKED_SCENE_MAX {
        return Err(FrameError::TrailingBytes(data.len() - PACKED_SCENE_MAX));
    }

    let mut unpacked = codec::decode(data);
    if unpacked.len() > LAST_GROUP_OFFSET && unpacked.len() < SCENE_LEN {
        unpacked.resize(SCENE_LEN, 0);
    }
    Ok(unpacked)
}

/// Cursor over a frame that reports which field ran short.
struct FrameReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FrameReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], FrameError> {
        let available = self.buf.len() - self.pos;
        if available < len {
            return Err(FrameError::Truncated { field, offset: self.pos, needed: len, available });
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn byte(&mut self, field: &'static str) -> Result<u8, FrameError> {
        Ok(self.take(field, 1)?[0])
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], FrameError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(field, N)?);
        Ok(out)
    }

    fn expect(&mut self, field: &'static str, expected: u8) -> Result<(), FrameError> {
        let found = self.byte(field)?;
        if found == expected {
            Ok(())
        } else {
            Err(FrameError::BadMarker { field, expected, found })
        }
    }

    fn rest(&mut self) -> &'a [u8] {
        let rest = &self.buf[self.pos..];
        self.pos = self.buf.len();
        rest
    }

    fn finish(self) -> Result<(), FrameError> {
        match self.buf.len() - self.pos {
            0 => Ok(()),
            extra => Err(FrameError::TrailingBytes(extra)),
        }
    }
}

/// Outer vendor envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KorgMessage {
    /// `0x40 | channel` as sent by the device
    pub channel_byte: u8,
    pub format: u8,
    pub function_id: u8,
    pub payload: Vec<u8>,
}

impl KorgMessage {
    /// Parse the envelope; the payload is everything after the header.
    ///
    /// # Errors
    /// Fails on a wrong marker, a wrong project tag or a short header.
    pub fn parse(buf: &[u8]) -> Result<Self, FrameError> {
        let mut reader = FrameReader::new(buf);
        reader.expect("exclusive marker", KORG_EXCLUSIVE)?;
        let channel_byte = reader.byte("channel")?;
        let tag = reader.take("software project", SOFTWARE_PROJECT.len())?;
        if tag != SOFTWARE_PROJECT {
            return Err(FrameError::BadTag { found: tag.to_vec() });
        }
        let format = reader.byte("format")?;
        let function_id = reader.byte("function id")?;
        let payload = reader.rest().to_vec();

        Ok(Self { channel_byte, format, function_id, payload })
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + self.payload.len());
        out.push(KORG_EXCLUSIVE);
        out.push(self.channel_byte);
        out.extend_from_slice(&SOFTWARE_PROJECT);
        out.push(self.format);
        out.push(self.function_id);
        out.extend_from_slice(&self.payload);
        out
    }
}

/// Data dump response record carried inside a [`KorgMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpResponse {
    pub structure: u8,
    /// Length announced by the device, reassembled from its 7-bit halves
    pub data_len: u16,
    pub function_id: u8,
    /// Bit-packed scene data
    pub data: Vec<u8>,
}

impl DumpResponse {
    /// Function id of a current scene data dump.
    pub const SCENE_DUMP: u8 = 0x40;
    /// Structure byte of a scene data dump.
    pub const SCENE_STRUCTURE: u8 = 0x02;

    /// Parse the response header; the packed data is the remainder.
    ///
    /// # Errors
    /// Fails if the header is short.
    pub fn parse(buf: &[u8]) -> Result<Self, FrameError> {
        let mut reader = FrameReader::new(buf);
        let structure = reader.byte("structure")?;
        let msb = reader.byte("data length msb")?;
        let lsb = reader.byte("data length lsb")?;
        let function_id = reader.byte("function id")?;
        let data = reader.rest().to_vec();

        Ok(Self {
            structure,
            data_len: (u16::from(msb & 0x7f) << 7) | u16::from(lsb & 0x7f),
            function_id,
            data,
        })
    }

    /// Wrap an unpacked scene into a response record, packed to
    /// [`PACKED_SCENE_LEN`] bytes like the device does.
    #[must_use]
    pub fn from_scene(scene: &SceneDump) -> Self {
        let mut data = codec::encode(&scene.to_bytes());
        data.truncate(PACKED_SCENE_LEN);
        // The announced length counts the function id.
        let data_len = u16::try_from(data.len() + 1).unwrap_or(u16::MAX);
        Self { structure: Self::SCENE_STRUCTURE, data_len, function_id: Self::SCENE_DUMP, data }
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.data.len());
        out.push(self.structure);
        out.push(((self.data_len >> 7) & 0x7f) as u8);
        out.push((self.data_len & 0x7f) as u8);
        out.push(self.function_id);
        out.extend_from_slice(&self.data);
        out
    }
}

/// Common scene parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommonParams {
    pub global_midi_channel: u8,
    pub control_mode: u8,
    pub led_mode: u8,
}

/// Continuous control (slider or knob).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VariableControl {
    pub assign_type: u8,
    pub reserved1: u8,
    pub control_number: u8,
    pub min_value: u8,
    pub max_value: u8,
    pub reserved2: u8,
}

/// Momentary or toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonControl {
    pub assign_type: u8,
    pub behavior: u8,
    pub control_number: u8,
    pub off_value: u8,
    pub on_value: u8,
    pub reserved: u8,
}

/// One 6-byte control record, shaped by its position in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlParams {
    Variable(VariableControl),
    Button(ButtonControl),
}

impl ControlParams {
    /// MIDI control number the record is assigned to.
    #[must_use]
    pub fn control_number(&self) -> u8 {
        match self {
            Self::Variable(v) => v.control_number,
            Self::Button(b) => b.control_number,
        }
    }

    fn read_variable(reader: &mut FrameReader<'_>) -> Result<Self, FrameError> {
        let [assign_type, reserved1, control_number, min_value, max_value, reserved2] =
            reader.array("variable control")?;
        Ok(Self::Variable(VariableControl {
            assign_type,
            reserved1,
            control_number,
            min_value,
            max_value,
            reserved2,
        }))
    }

    fn read_button(reader: &mut FrameReader<'_>) -> Result<ButtonControl, FrameError> {
        let [assign_type, behavior, control_number, off_value, on_value, reserved] =
            reader.array("button control")?;
        Ok(ButtonControl { assign_type, behavior, control_number, off_value, on_value, reserved })
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Variable(v) => out.extend_from_slice(&[
                v.assign_type,
                v.reserved1,
                v.control_number,
                v.min_value,
                v.max_value,
                v.reserved2,
            ]),
            Self::Button(b) => write_button(b, out),
        }
    }
}

fn write_button(b: &ButtonControl, out: &mut Vec<u8>) {
    out.extend_from_slice(&[
        b.assign_type,
        b.behavior,
        b.control_number,
        b.off_value,
        b.on_value,
        b.reserved,
    ]);
}

/// Controls of a fader group, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupControl {
    Slider,
    Knob,
    Solo,
    Mute,
    Rec,
}

impl GroupControl {
    pub const ALL: [Self; 5] = [Self::Slider, Self::Knob, Self::Solo, Self::Mute, Self::Rec];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Slider => "slider",
            Self::Knob => "knob",
            Self::Solo => "solo",
            Self::Mute => "mute",
            Self::Rec => "rec",
        }
    }
}

/// One fader group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupParams {
    pub midi_channel: u8,
    pub slider: ControlParams,
    pub knob: ControlParams,
    pub solo: ControlParams,
    pub mute: ControlParams,
    pub rec: ControlParams,
}

impl GroupParams {
    /// Get a control record by position.
    #[must_use]
    pub fn control(&self, control: GroupControl) -> &ControlParams {
        match control {
            GroupControl::Slider => &self.slider,
            GroupControl::Knob => &self.knob,
            GroupControl::Solo => &self.solo,
            GroupControl::Mute => &self.mute,
            GroupControl::Rec => &self.rec,
        }
    }

    fn read(reader: &mut FrameReader<'_>) -> Result<Self, FrameError> {
        Ok(Self {
            midi_channel: reader.byte("group channel")?,
            slider: ControlParams::read_variable(reader)?,
            knob: ControlParams::read_variable(reader)?,
            solo: ControlParams::Button(ControlParams::read_button(reader)?),
            mute: ControlParams::Button(ControlParams::read_button(reader)?),
            rec: ControlParams::Button(ControlParams::read_button(reader)?),
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(self.midi_channel);
        for control in GroupControl::ALL {
            self.control(control).write(out);
        }
    }
}

/// Transport buttons, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportAction {
    PrevTrack,
    NextTrack,
    Cycle,
    MarkerSet,
    PrevMarker,
    NextMarker,
    Rew,
    Ff,
    Stop,
    Play,
    Rec,
}

impl TransportAction {
    pub const ALL: [Self; TRANSPORT_COUNT] = [
        Self::PrevTrack,
        Self::NextTrack,
        Self::Cycle,
        Self::MarkerSet,
        Self::PrevMarker,
        Self::NextMarker,
        Self::Rew,
        Self::Ff,
        Self::Stop,
        Self::Play,
        Self::Rec,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PrevTrack => "prev_track",
            Self::NextTrack => "next_track",
            Self::Cycle => "cycle",
            Self::MarkerSet => "marker_set",
            Self::PrevMarker => "prev_marker",
            Self::NextMarker => "next_marker",
            Self::Rew => "rew",
            Self::Ff => "ff",
            Self::Stop => "stop",
            Self::Play => "play",
            Self::Rec => "rec",
        }
    }
}

/// Transport section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportParams {
    pub midi_channel: u8,
    /// Indexed in [`TransportAction::ALL`] order
    pub buttons: [ButtonControl; TRANSPORT_COUNT],
}

impl TransportParams {
    #[must_use]
    pub fn button(&self, action: TransportAction) -> &ButtonControl {
        &self.buttons[action as usize]
    }

    fn read(reader: &mut FrameReader<'_>) -> Result<Self, FrameError> {
        let midi_channel = reader.byte("transport channel")?;
        let mut buttons = [ButtonControl::default(); TRANSPORT_COUNT];
        for button in &mut buttons {
            *button = ControlParams::read_button(reader)?;
        }
        Ok(Self { midi_channel, buttons })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(self.midi_channel);
        for button in &self.buttons {
            write_button(button, out);
        }
    }
}

/// Decoded scene: every control-to-MIDI assignment of the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneDump {
    pub common: CommonParams,
    pub groups: [GroupParams; GROUP_COUNT],
    pub transport: TransportParams,
    pub custom_daw_assign: [u8; CUSTOM_DAW_ASSIGN_LEN],
    pub reserved: [u8; RESERVED_LEN],
}

impl SceneDump {
    /// Parse the unpacked scene layout. The buffer must be exactly
    /// [`SCENE_LEN`] bytes long.
    ///
    /// # Errors
    /// Fails on a short buffer or trailing bytes.
    pub fn parse(buf: &[u8]) -> Result<Self, FrameError> {
        let mut reader = FrameReader::new(buf);

        let [global_midi_channel, control_mode, led_mode] = reader.array("common parameters")?;
        let common = CommonParams { global_midi_channel, control_mode, led_mode };

        let mut groups = Vec::with_capacity(GROUP_COUNT);
        for _ in 0..GROUP_COUNT {
            groups.push(GroupParams::read(&mut reader)?);
        }
        let groups: [GroupParams; GROUP_COUNT] =
            groups.try_into().map_err(|_| FrameError::Truncated {
                field: "groups",
                offset: COMMON_LEN,
                needed: GROUP_COUNT * GROUP_LEN,
                available: 0,
            })?;

        let transport = TransportParams::read(&mut reader)?;
        let custom_daw_assign = reader.array("custom daw assign")?;
        let reserved = reader.array("reserved")?;
        reader.finish()?;

        Ok(Self { common, groups, transport, custom_daw_assign, reserved })
    }

    /// Serialize back into the unpacked layout.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SCENE_LEN);
        out.extend_from_slice(&[
            self.common.global_midi_channel,
            self.common.control_mode,
            self.common.led_mode,
        ]);
        for group in &self.groups {
            group.write(&mut out);
        }
        self.transport.write(&mut out);
        out.extend_from_slice(&self.custom_daw_assign);
        out.extend_from_slice(&self.reserved);
        out
    }

    /// Build the full SysEx body the device sends for this scene. The last
    /// four reserved bytes are not transmitted.
    #[must_use]
    pub fn to_message(&self, channel: u8) -> Vec<u8> {
        KorgMessage {
            channel_byte: 0x40 | (channel & 0x0f),
            format: 0x7f,
            function_id: 0x7f,
            payload: DumpResponse::from_scene(self).to_bytes(),
        }
        .to_bytes()
    }

    /// Resolve a group or transport channel byte against the global channel.
    #[must_use]
    pub fn resolve_channel(&self, channel: u8) -> u8 {
        if channel == INHERIT_CHANNEL { self.common.global_midi_channel } else { channel }
    }
}

impl Default for SceneDump {
    /// Factory default assignments: CC 0-7 sliders, 16-23 knobs, 32-39 solo,
    /// 48-55 mute, 64-71 rec, every group on the global channel.
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        let button = |control_number| ButtonControl {
            assign_type: 1,
            behavior: 0,
            control_number,
            off_value: 0,
            on_value: 127,
            reserved: 0,
        };
        let variable = |control_number| {
            ControlParams::Variable(VariableControl {
                assign_type: 1,
                reserved1: 0,
                control_number,
                min_value: 0,
                max_value: 127,
                reserved2: 0,
            })
        };

        let groups = std::array::from_fn(|i| {
            // GROUP_COUNT fits in u8.
            let i = i as u8;
            GroupParams {
                midi_channel: INHERIT_CHANNEL,
                slider: variable(i),
                knob: variable(16 + i),
                solo: ControlParams::Button(button(32 + i)),
                mute: ControlParams::Button(button(48 + i)),
                rec: ControlParams::Button(button(64 + i)),
            }
        });

        let transport_numbers: [u8; TRANSPORT_COUNT] = [58, 59, 46, 60, 61, 62, 43, 44, 42, 41, 45];
        let transport = TransportParams {
            midi_channel: INHERIT_CHANNEL,
            buttons: transport_numbers.map(button),
        };

        Self {
            common: CommonParams { global_midi_channel: 0, control_mode: 0, led_mode: 1 },
            groups,
            transport,
            custom_daw_assign: [0; CUSTOM_DAW_ASSIGN_LEN],
            reserved: [0; RESERVED_LEN],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_scene_layout_length() {
        assert_eq!(SCENE_LEN, 343);
        assert_eq!(SceneDump::default().to_bytes().len(), SCENE_LEN);
    }

    #[test]
    fn test_scene_request_bytes() {
        assert_eq!(scene_request(0), [0x42, 0x40, 0x00, 0x01, 0x13, 0x00, 0x1f, 0x10, 0x00]);
        assert_eq!(scene_request(3)[1], 0x43);
    }

    #[test]
    fn test_parse_scene_message_decodes_default_scene() {
        let scene = SceneDump::default();
        let parsed = parse_scene_message(&scene.to_message(0)).expect("valid scene");
        assert_eq!(parsed, scene);
    }

    #[test]
    fn test_parse_reads_fields_at_layout_offsets() {
        let mut raw = SceneDump::default().to_bytes();
        raw[0] = 5; // global channel
        raw[3 + 31 * 2] = 0x02; // group 2 channel
        raw[3 + 31 * 2 + 3] = 0; // group 2 slider control number
        raw[3 + 31 * 2 + 1 + 6 * 3 + 2] = 99; // group 2 mute control number

        let scene = SceneDump::parse(&raw).expect("valid layout");
        assert_eq!(scene.common.global_midi_channel, 5);
        assert_eq!(scene.groups[2].midi_channel, 2);
        assert_eq!(scene.groups[2].slider.control_number(), 0);
        assert_eq!(scene.groups[2].mute.control_number(), 99);
        assert_matches!(scene.groups[2].knob, ControlParams::Variable(_));
        assert_matches!(scene.groups[2].rec, ControlParams::Button(_));
    }

    #[test]
    fn test_transport_buttons_in_layout_order() {
        let scene = SceneDump::default();
        assert_eq!(scene.transport.button(TransportAction::PrevTrack).control_number, 58);
        assert_eq!(scene.transport.button(TransportAction::Play).control_number, 41);
        assert_eq!(scene.transport.button(TransportAction::Rec).control_number, 45);
    }

    #[test]
    fn test_wrong_marker_rejected() {
        let mut body = SceneDump::default().to_message(0);
        body[0] = 0x41;
        assert_matches!(
            parse_scene_message(&body),
            Err(FrameError::BadMarker { expected: 0x42, found: 0x41, .. })
        );
    }

    #[test]
    fn test_wrong_project_tag_rejected() {
        let mut body = SceneDump::default().to_message(0);
        body[4] = 0x12;
        assert_matches!(parse_scene_message(&body), Err(FrameError::BadTag { .. }));
    }

    #[test]
    fn test_short_scene_rejected() {
        let raw = SceneDump::default().to_bytes();
        assert_matches!(
            SceneDump::parse(&raw[..raw.len() - 1]),
            Err(FrameError::Truncated { field: "reserved", .. })
        );
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut raw = SceneDump::default().to_bytes();
        raw.push(0);
        assert_eq!(SceneDump::parse(&raw), Err(FrameError::TrailingBytes(1)));
    }

    #[test]
    fn test_short_envelope_rejected() {
        assert_matches!(
            parse_scene_message(&[0x42, 0x40, 0x00]),
            Err(FrameError::Truncated { field: "software project", .. })
        );
        assert_matches!(parse_scene_message(&[]), Err(FrameError::Truncated { .. }));
    }

    #[test]
    fn test_other_sysex_is_not_a_scene() {
        // Scene change notification: valid envelope, no dump payload.
        let body = [0x42, 0x40, 0x00, 0x01, 0x13, 0x00, 0x5f, 0x4f, 0x00];
        assert_matches!(parse_scene_message(&body), Err(FrameError::Truncated { .. }));
    }

    #[test]
    fn test_dump_response_length_split() {
        let response = DumpResponse::from_scene(&SceneDump::default());
        let bytes = response.to_bytes();
        let parsed = DumpResponse::parse(&bytes).expect("valid response");
        assert_eq!(parsed.data_len, 389);
        assert_eq!(&bytes[..4], &[0x02, 0x03, 0x05, 0x40]);
        assert_eq!(parsed.data.len(), PACKED_SCENE_LEN);
        assert_eq!(parsed, response);
    }

    /// Body as captured from the device: 388 packed bytes after the header.
    fn device_frame(scene: &SceneDump, packed_len: usize) -> Vec<u8> {
        let mut body = vec![0x42, 0x40, 0x00, 0x01, 0x13, 0x00, 0x7f, 0x7f, 0x02, 0x03, 0x05, 0x40];
        let packed = codec::encode(&scene.to_bytes());
        body.extend_from_slice(&packed[..packed_len.min(packed.len())]);
        body.resize(12 + packed_len, 0);
        body
    }

    #[test]
    fn test_device_frame_with_short_final_group() {
        let mut scene = SceneDump::default();
        scene.reserved[10] = 0x55;
        scene.custom_daw_assign[9] = 0x81;

        let parsed = parse_scene_message(&device_frame(&scene, PACKED_SCENE_LEN)).expect("device frame");
        assert_eq!(parsed, scene);
        assert_eq!(device_frame(&scene, PACKED_SCENE_LEN), scene.to_message(0));
    }

    #[test]
    fn test_device_frame_missing_a_whole_group_rejected() {
        let body = device_frame(&SceneDump::default(), PACKED_SCENE_LEN - 4);
        assert_matches!(parse_scene_message(&body), Err(FrameError::Truncated { field: "reserved", .. }));
    }

    #[test]
    fn test_device_frame_with_extra_packed_bytes_rejected() {
        let body = device_frame(&SceneDump::default(), PACKED_SCENE_MAX + 1);
        assert_eq!(parse_scene_message(&body), Err(FrameError::TrailingBytes(1)));

        // A complete final group decodes to exactly the layout.
        let body = device_frame(&SceneDump::default(), PACKED_SCENE_MAX);
        assert_eq!(parse_scene_message(&body), Ok(SceneDump::default()));
    }

    #[test]
    fn test_resolve_channel() {
        let mut scene = SceneDump::default();
        scene.common.global_midi_channel = 5;
        assert_eq!(scene.resolve_channel(INHERIT_CHANNEL), 5);
        assert_eq!(scene.resolve_channel(9), 9);
    }
}
