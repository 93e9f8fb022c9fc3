// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::Preventable;

/// What happened. [`MouseParser`](crate::MouseParser) only produces `Down`, `Up`,
/// `Move`, `Drag`, and `Scroll`; the rest are synthesized by hit testing in the layer that
/// knows where things are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum MouseEventKind {
    #[strum(serialize = "down")]
    Down,
    #[strum(serialize = "up")]
    Up,
    #[strum(serialize = "move")]
    Move,
    #[strum(serialize = "drag")]
    Drag,
    #[strum(serialize = "drag-end")]
    DragEnd,
    #[strum(serialize = "drop")]
    Drop,
    #[strum(serialize = "over")]
    Over,
    #[strum(serialize = "out")]
    Out,
    #[strum(serialize = "scroll")]
    Scroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ScrollDirection {
    #[strum(serialize = "up")]
    Up,
    #[strum(serialize = "down")]
    Down,
    #[strum(serialize = "left")]
    Left,
    #[strum(serialize = "right")]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollInfo {
    pub direction: ScrollDirection,
    /// Always 1. Terminals send one report per wheel tick.
    pub delta: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseModifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

/// One decoded mouse report. Coordinates are 0 based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    /// 0 left, 1 middle, 2 right, 3 none.
    pub button: u8,
    pub x: u32,
    pub y: u32,
    pub modifiers: MouseModifiers,
    pub scroll: Option<ScrollInfo>,
    default_prevented: bool,
}

impl MouseEvent {
    #[must_use]
    pub fn new(kind: MouseEventKind, button: u8, x: u32, y: u32) -> Self {
        Self {
            kind,
            button,
            x,
            y,
            modifiers: MouseModifiers::default(),
            scroll: None,
            default_prevented: false,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: MouseModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_scroll(mut self, direction: ScrollDirection) -> Self {
        self.scroll = Some(ScrollInfo { direction, delta: 1 });
        self
    }
}

impl Preventable for MouseEvent {
    fn prevent_default(&mut self) { self.default_prevented = true; }

    fn is_default_prevented(&self) -> bool { self.default_prevented }
}
