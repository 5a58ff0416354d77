//! Script triggers.
//!
//! A script is declared as `[trigger,name]`. The trigger decides when the
//! engine runs the script and which pointers are valid when it starts.

use std::fmt;

use crate::PointerSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Proc,
    Label,
    Queue,
    WeakQueue,
    Timer,
    SoftTimer,
    AiQueue,
    AiTimer,
    OpNpc(u8),
    OpLoc(u8),
    OpObj(u8),
    OpHeld(u8),
    IfButton,
    Login,
    Logout,
    DebugProc,
}

impl Trigger {
    /// Triggers that other scripts can call into (`Gosub` / `Jump` targets).
    pub fn is_invokable(self) -> bool {
        matches!(self, Trigger::Proc | Trigger::Label)
    }

    /// Pointers the engine guarantees when a script of this trigger starts.
    ///
    /// Invokable scripts inherit their caller's state and start with nothing.
    pub fn entry_pointers(self) -> PointerSet {
        let player = PointerSet::ACTIVE_PLAYER | PointerSet::P_ACTIVE_PLAYER;
        match self {
            Trigger::Proc | Trigger::Label => PointerSet::empty(),
            Trigger::Queue
            | Trigger::Timer
            | Trigger::IfButton
            | Trigger::Login
            | Trigger::Logout
            | Trigger::DebugProc => player,
            Trigger::WeakQueue | Trigger::SoftTimer => PointerSet::ACTIVE_PLAYER,
            Trigger::AiQueue | Trigger::AiTimer => PointerSet::ACTIVE_NPC,
            Trigger::OpNpc(_) => player | PointerSet::ACTIVE_NPC,
            Trigger::OpLoc(_) => player | PointerSet::ACTIVE_LOC,
            Trigger::OpObj(_) | Trigger::OpHeld(_) => player | PointerSet::ACTIVE_OBJ,
        }
    }

    pub fn name(self) -> String {
        match self {
            Trigger::Proc => "proc".into(),
            Trigger::Label => "label".into(),
            Trigger::Queue => "queue".into(),
            Trigger::WeakQueue => "weakqueue".into(),
            Trigger::Timer => "timer".into(),
            Trigger::SoftTimer => "softtimer".into(),
            Trigger::AiQueue => "ai_queue".into(),
            Trigger::AiTimer => "ai_timer".into(),
            Trigger::OpNpc(n) => format!("opnpc{n}"),
            Trigger::OpLoc(n) => format!("oploc{n}"),
            Trigger::OpObj(n) => format!("opobj{n}"),
            Trigger::OpHeld(n) => format!("opheld{n}"),
            Trigger::IfButton => "if_button".into(),
            Trigger::Login => "login".into(),
            Trigger::Logout => "logout".into(),
            Trigger::DebugProc => "debugproc".into(),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
