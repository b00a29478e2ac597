//! Tic-tac-toe. The user plays X and always moves first; the pet plays O.

use super::{conclude, ensure_can_play, Input};
use crate::error::PetError;
use crate::model::{GameKind, PetEvent, PetState};
use crate::rules::{Reward, Rules};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Empty,
    User,
    Pet,
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];
const CENTER: usize = 4;
const CORNERS: [usize; 4] = [0, 2, 6, 8];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board([Mark; 9]);

impl Default for Board {
    fn default() -> Self {
        Board([Mark::Empty; 9])
    }
}

impl Board {
    pub fn cell(&self, idx: usize) -> Option<Mark> {
        self.0.get(idx).copied()
    }

    pub fn is_free(&self, idx: usize) -> bool {
        self.cell(idx) == Some(Mark::Empty)
    }

    pub fn free_cells(&self) -> Vec<usize> {
        (0..9).filter(|i| self.is_free(*i)).collect()
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|m| *m != Mark::Empty)
    }

    pub fn has_line(&self, mark: Mark) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|i| self.0[*i] == mark))
    }

    /// The empty cell that would complete a line for `mark`, scanning lines in
    /// row, column, diagonal order.
    pub fn completing_cell(&self, mark: Mark) -> Option<usize> {
        LINES.iter().find_map(|line| {
            let owned = line.iter().filter(|i| self.0[**i] == mark).count();
            let empty: Vec<usize> = line
                .iter()
                .copied()
                .filter(|i| self.0[*i] == Mark::Empty)
                .collect();
            (owned == 2 && empty.len() == 1).then(|| empty[0])
        })
    }

    fn place(&mut self, idx: usize, mark: Mark) {
        self.0[idx] = mark;
    }
}

/// Accepts nine cells of `X`, `O` and blanks (` `, `_` or `.`).
impl FromStr for Board {
    type Err = PetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells: Vec<char> = s.chars().collect();
        if cells.len() != 9 {
            return Err(PetError::InvalidInput(format!(
                "a board has 9 cells, got {}",
                cells.len()
            )));
        }
        let mut board = Board::default();
        for (i, c) in cells.into_iter().enumerate() {
            board.0[i] = match c {
                'X' | 'x' => Mark::User,
                'O' | 'o' => Mark::Pet,
                ' ' | '_' | '.' => Mark::Empty,
                other => {
                    return Err(PetError::InvalidInput(format!("unknown cell '{other}'")))
                }
            };
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.0.iter().enumerate() {
            let c = match m {
                Mark::Empty => ' ',
                Mark::User => 'X',
                Mark::Pet => 'O',
            };
            write!(f, "{c}")?;
            if i % 3 == 2 && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveRule {
    Win,
    Block,
    Center,
    Corner,
    Any,
}

/// Evaluated in this order; the first rule that yields a cell is played.
pub const MOVE_RULES: [MoveRule; 5] = [
    MoveRule::Win,
    MoveRule::Block,
    MoveRule::Center,
    MoveRule::Corner,
    MoveRule::Any,
];

impl MoveRule {
    pub fn pick<R: Rng + ?Sized>(self, board: &Board, rng: &mut R) -> Option<usize> {
        match self {
            MoveRule::Win => board.completing_cell(Mark::Pet),
            MoveRule::Block => board.completing_cell(Mark::User),
            MoveRule::Center => board.is_free(CENTER).then_some(CENTER),
            MoveRule::Corner => {
                let free: Vec<usize> = CORNERS.iter().copied().filter(|c| board.is_free(*c)).collect();
                free.choose(rng).copied()
            }
            MoveRule::Any => board.free_cells().choose(rng).copied(),
        }
    }
}

pub fn choose_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<(usize, MoveRule)> {
    MOVE_RULES
        .iter()
        .find_map(|rule| rule.pick(board, rng).map(|idx| (idx, *rule)))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchResult {
    UserWins,
    PetWins,
    Draw,
    Abandoned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Turn {
    pub user: usize,
    pub pet: Option<(usize, MoveRule)>,
    pub result: Option<MatchResult>,
}

/// Turn-by-turn match, for callers that show the board between moves.
#[derive(Clone, Debug, Default)]
pub struct TicTacToeMatch {
    board: Board,
    result: Option<MatchResult>,
}

impl TicTacToeMatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }

    pub fn abandon(&mut self) {
        if self.result.is_none() {
            self.result = Some(MatchResult::Abandoned);
        }
    }

    /// Plays the user's move at `cell` and answers with the pet's move.
    /// Occupied or out-of-range cells are rejected and the turn is not spent.
    pub fn play<R: Rng + ?Sized>(&mut self, cell: usize, rng: &mut R) -> Result<Turn, PetError> {
        if self.result.is_some() {
            return Err(PetError::InvalidInput("the match is over".into()));
        }
        if cell > 8 {
            return Err(PetError::InvalidInput(format!("cell {cell} is outside 0..=8")));
        }
        if !self.board.is_free(cell) {
            return Err(PetError::InvalidInput(format!("cell {cell} is taken")));
        }

        self.board.place(cell, Mark::User);
        if self.board.has_line(Mark::User) {
            return Ok(self.finish(cell, None, MatchResult::UserWins));
        }
        if self.board.is_full() {
            return Ok(self.finish(cell, None, MatchResult::Draw));
        }

        let reply = choose_move(&self.board, rng);
        if let Some((idx, _)) = reply {
            self.board.place(idx, Mark::Pet);
        }
        if self.board.has_line(Mark::Pet) {
            return Ok(self.finish(cell, reply, MatchResult::PetWins));
        }
        if self.board.is_full() {
            return Ok(self.finish(cell, reply, MatchResult::Draw));
        }
        Ok(Turn {
            user: cell,
            pet: reply,
            result: None,
        })
    }

    fn finish(&mut self, user: usize, pet: Option<(usize, MoveRule)>, result: MatchResult) -> Turn {
        self.result = Some(result);
        Turn {
            user,
            pet,
            result: Some(result),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TicTacToeGame {
    pub board: Board,
    pub turns: Vec<Turn>,
    pub rejected: usize,
    pub result: MatchResult,
    pub reward: Reward,
    pub events: Vec<PetEvent>,
}

/// Settles a finished (or abandoned) match against the pet's state.
pub fn finish_tictactoe(
    state: &mut PetState,
    game: &TicTacToeMatch,
    now: DateTime<Utc>,
    rules: &Rules,
) -> Result<(MatchResult, Reward, Vec<PetEvent>), PetError> {
    ensure_can_play(state, rules)?;
    let result = game.result().unwrap_or(MatchResult::Abandoned);
    let reward = match result {
        MatchResult::UserWins => rules.tictactoe.user_win,
        MatchResult::Draw => rules.tictactoe.draw,
        MatchResult::PetWins => rules.tictactoe.pet_win,
        MatchResult::Abandoned => Reward::NONE,
    };
    let events = conclude(
        state,
        GameKind::TicTacToe,
        rules.tictactoe_cost,
        &reward,
        now,
        rules,
    );
    Ok((result, reward, events))
}

/// Plays a whole match from a sequence of user inputs. Running out of inputs
/// before the match ends counts as quitting.
pub fn play_tictactoe<I, R>(
    state: &mut PetState,
    moves: I,
    now: DateTime<Utc>,
    rules: &Rules,
    rng: &mut R,
) -> Result<TicTacToeGame, PetError>
where
    I: IntoIterator<Item = Input<u32>>,
    R: Rng + ?Sized,
{
    ensure_can_play(state, rules)?;

    let mut game = TicTacToeMatch::new();
    let mut turns = Vec::new();
    let mut rejected = 0;
    for input in moves {
        let cell = match input {
            Input::Quit => break,
            Input::Pick(cell) => cell as usize,
        };
        match game.play(cell, rng) {
            Ok(turn) => turns.push(turn),
            Err(e) => {
                log::debug!("tictactoe: {e}");
                rejected += 1;
            }
        }
        if game.result().is_some() {
            break;
        }
    }
    game.abandon();

    let (result, reward, events) = finish_tictactoe(state, &game, now, rules)?;
    Ok(TicTacToeGame {
        board: *game.board(),
        turns,
        rejected,
        result,
        reward,
        events,
    })
}
