//! Absolute pointer backed by a Linux uinput virtual device.
//!
//! The device advertises ABS_X/ABS_Y spanning the configured screen and the
//! left/right buttons, so the compositor treats it like a tablet-style pointer.
//! uinput cannot read the real cursor back; `position()` reports the last
//! coordinate we emitted.

use evdev::{
    AbsInfo, AbsoluteAxisCode, AttributeSet, BusType, EventType, InputEvent, InputId, KeyCode,
    SynchronizationCode, UinputAbsSetup, uinput::VirtualDevice,
};
use gazectl_traits::{BoxError, PointerPort, clamp_to_screen};

use crate::error::{HwError, Result};

pub struct UinputPointer {
    device: VirtualDevice,
    width: u32,
    height: u32,
    pos: (i32, i32),
}

impl UinputPointer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let max_x = i32::try_from(width.max(1) - 1).unwrap_or(i32::MAX);
        let max_y = i32::try_from(height.max(1) - 1).unwrap_or(i32::MAX);

        let mut keys = AttributeSet::<KeyCode>::new();
        keys.insert(KeyCode::BTN_LEFT);
        keys.insert(KeyCode::BTN_RIGHT);

        let uinput = |e: std::io::Error| HwError::Uinput(e.to_string());

        // Each with_* consumes the builder, so rebind at every step.
        let mut builder = VirtualDevice::builder()?;
        builder = builder.name("gazectl absolute pointer");
        builder = builder.input_id(InputId::new(BusType::BUS_VIRTUAL, 0x1d6b, 0x0104, 1));
        builder = builder.with_keys(&keys).map_err(uinput)?;
        builder = builder
            .with_absolute_axis(&UinputAbsSetup::new(
                AbsoluteAxisCode::ABS_X,
                AbsInfo::new(0, 0, max_x, 0, 0, 0),
            ))
            .map_err(uinput)?;
        builder = builder
            .with_absolute_axis(&UinputAbsSetup::new(
                AbsoluteAxisCode::ABS_Y,
                AbsInfo::new(0, 0, max_y, 0, 0, 0),
            ))
            .map_err(uinput)?;
        let device = builder.build().map_err(uinput)?;

        tracing::info!(width, height, "uinput pointer created");
        Ok(UinputPointer {
            device,
            width,
            height,
            pos: (max_x / 2, max_y / 2),
        })
    }

    fn click(&mut self, button: KeyCode) -> Result<()> {
        let syn = InputEvent::new(
            EventType::SYNCHRONIZATION.0,
            SynchronizationCode::SYN_REPORT.0,
            0,
        );
        self.device
            .emit(&[InputEvent::new(EventType::KEY.0, button.0, 1), syn])
            .map_err(|e| HwError::Uinput(e.to_string()))?;
        self.device
            .emit(&[InputEvent::new(EventType::KEY.0, button.0, 0), syn])
            .map_err(|e| HwError::Uinput(e.to_string()))?;
        Ok(())
    }
}

impl PointerPort for UinputPointer {
    fn screen_bounds(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn position(&self) -> std::result::Result<(i32, i32), BoxError> {
        Ok(self.pos)
    }

    fn move_to(&mut self, x: i32, y: i32) -> std::result::Result<(), BoxError> {
        let (x, y) = clamp_to_screen(x, y, self.width, self.height);
        let events = [
            InputEvent::new(EventType::ABSOLUTE.0, AbsoluteAxisCode::ABS_X.0, x),
            InputEvent::new(EventType::ABSOLUTE.0, AbsoluteAxisCode::ABS_Y.0, y),
            InputEvent::new(
                EventType::SYNCHRONIZATION.0,
                SynchronizationCode::SYN_REPORT.0,
                0,
            ),
        ];
        self.device
            .emit(&events)
            .map_err(|e| Box::new(HwError::Uinput(e.to_string())) as BoxError)?;
        self.pos = (x, y);
        Ok(())
    }

    fn left_click(&mut self) -> std::result::Result<(), BoxError> {
        self.click(KeyCode::BTN_LEFT).map_err(|e| Box::new(e) as BoxError)
    }

    fn right_click(&mut self) -> std::result::Result<(), BoxError> {
        self.click(KeyCode::BTN_RIGHT).map_err(|e| Box::new(e) as BoxError)
    }
}
