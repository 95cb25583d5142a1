//! Controller command codes (fixed by the controller's programmer's guide).

pub const READ_ERROR_CODE: u16 = 0x0100;
pub const READ_ERROR_DESCRIPTION: u16 = 0x0101;
pub const POWER_MODE: u16 = 0x0200;
pub const IDLE_MODE: u16 = 0x0201;
pub const FIRMWARE_VERSION: u16 = 0x0205;
pub const HARDWARE_INFO: u16 = 0x0206;

pub const FLIP_LONG_AXIS: u16 = 0x1008;
pub const FLIP_SHORT_AXIS: u16 = 0x1009;
pub const TEST_PATTERN: u16 = 0x1203;

pub const INPUT_SOURCE: u16 = 0x1A00;
pub const PORT_POWER: u16 = 0x1A01;
pub const PORT_CLOCK: u16 = 0x1A03;
pub const HARDWARE_STATUS: u16 = 0x1A0A;
pub const SYSTEM_STATUS: u16 = 0x1A0B;
pub const MAIN_STATUS: u16 = 0x1A0C;
pub const DISPLAY_MODE: u16 = 0x1A1B;
pub const TRIGGER_OUT1: u16 = 0x1A1D;
pub const PATTERN_START_STOP: u16 = 0x1A24;
pub const OTF_INIT_PRIMARY: u16 = 0x1A2A;
pub const OTF_LOAD_PRIMARY: u16 = 0x1A2B;
pub const OTF_INIT_SECONDARY: u16 = 0x1A2C;
pub const OTF_LOAD_SECONDARY: u16 = 0x1A2D;
pub const PATTERN_LUT_CONFIG: u16 = 0x1A31;
pub const PATTERN_LUT_DEFINITION: u16 = 0x1A34;
pub const TRIGGER_IN1: u16 = 0x1A35;
pub const INPUT_SOURCE_CONFIG: u16 = 0x1A3C;
pub const MIN_LED_PULSE_WIDTH: u16 = 0x1A41;
pub const COMMUNICATION_STATUS: u16 = 0x1A49;
