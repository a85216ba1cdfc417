use easel_graphics::{Key, MouseButton};
use winit::event::{MouseButton as WinitButton, VirtualKeyCode};

pub(crate) fn mouse_button(button: WinitButton) -> MouseButton {
    match button {
        WinitButton::Left => MouseButton::Left,
        WinitButton::Right => MouseButton::Right,
        WinitButton::Middle => MouseButton::Middle,
        WinitButton::Other(code) => MouseButton::Other(code),
    }
}

/// Maps a winit key to an Easel key; `scancode` is kept for unmapped keys.
pub(crate) fn key(code: Option<VirtualKeyCode>, scancode: u32) -> Key {
    use VirtualKeyCode as V;
    let Some(code) = code else {
        return Key::Other(scancode);
    };
    match code {
        V::A => Key::Character('a'),
        V::B => Key::Character('b'),
        V::C => Key::Character('c'),
        V::D => Key::Character('d'),
        V::E => Key::Character('e'),
        V::F => Key::Character('f'),
        V::G => Key::Character('g'),
        V::H => Key::Character('h'),
        V::I => Key::Character('i'),
        V::J => Key::Character('j'),
        V::K => Key::Character('k'),
        V::L => Key::Character('l'),
        V::M => Key::Character('m'),
        V::N => Key::Character('n'),
        V::O => Key::Character('o'),
        V::P => Key::Character('p'),
        V::Q => Key::Character('q'),
        V::R => Key::Character('r'),
        V::S => Key::Character('s'),
        V::T => Key::Character('t'),
        V::U => Key::Character('u'),
        V::V => Key::Character('v'),
        V::W => Key::Character('w'),
        V::X => Key::Character('x'),
        V::Y => Key::Character('y'),
        V::Z => Key::Character('z'),
        V::Key0 | V::Numpad0 => Key::Character('0'),
        V::Key1 | V::Numpad1 => Key::Character('1'),
        V::Key2 | V::Numpad2 => Key::Character('2'),
        V::Key3 | V::Numpad3 => Key::Character('3'),
        V::Key4 | V::Numpad4 => Key::Character('4'),
        V::Key5 | V::Numpad5 => Key::Character('5'),
        V::Key6 | V::Numpad6 => Key::Character('6'),
        V::Key7 | V::Numpad7 => Key::Character('7'),
        V::Key8 | V::Numpad8 => Key::Character('8'),
        V::Key9 | V::Numpad9 => Key::Character('9'),
        V::Escape => Key::Escape,
        V::Return | V::NumpadEnter => Key::Enter,
        V::Back => Key::Backspace,
        V::Tab => Key::Tab,
        V::Space => Key::Space,
        V::Delete => Key::Delete,
        V::Insert => Key::Insert,
        V::Home => Key::Home,
        V::End => Key::End,
        V::PageUp => Key::PageUp,
        V::PageDown => Key::PageDown,
        V::Left => Key::Left,
        V::Right => Key::Right,
        V::Up => Key::Up,
        V::Down => Key::Down,
        V::LShift | V::RShift => Key::Shift,
        V::LControl | V::RControl => Key::Control,
        V::LAlt | V::RAlt => Key::Alt,
        V::LWin | V::RWin => Key::Super,
        V::F1 => Key::Function(1),
        V::F2 => Key::Function(2),
        V::F3 => Key::Function(3),
        V::F4 => Key::Function(4),
        V::F5 => Key::Function(5),
        V::F6 => Key::Function(6),
        V::F7 => Key::Function(7),
        V::F8 => Key::Function(8),
        V::F9 => Key::Function(9),
        V::F10 => Key::Function(10),
        V::F11 => Key::Function(11),
        V::F12 => Key::Function(12),
        _ => Key::Other(scancode),
    }
}
