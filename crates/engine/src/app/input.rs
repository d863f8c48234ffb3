use crate::world::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveRight,
    MoveDown,
    MoveLeft,
    SpeedUp,
    SpeedDown,
    Confirm,
    Back,
    DumpState,
    Quit,
}

const ACTION_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn clear(&mut self) {
        self.down = [false; ACTION_COUNT];
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveRight => 1,
            InputAction::MoveDown => 2,
            InputAction::MoveLeft => 3,
            InputAction::SpeedUp => 4,
            InputAction::SpeedDown => 5,
            InputAction::Confirm => 6,
            InputAction::Back => 7,
            InputAction::DumpState => 8,
            InputAction::Quit => 9,
        }
    }

    pub const fn for_direction(direction: Direction) -> InputAction {
        match direction {
            Direction::Up => InputAction::MoveUp,
            Direction::Right => InputAction::MoveRight,
            Direction::Down => InputAction::MoveDown,
            Direction::Left => InputAction::MoveLeft,
        }
    }
}
