use ndarray::Array2;
use std::collections::VecDeque;

use crate::*;

/// One game of minesweeper on a fixed mine layout.
///
/// Every mutating call returns a [`ChangeSet`] listing the cells that changed, so a view
/// can redraw only those. Calls on a finished game, repeated reveals and flags on revealed
/// cells are accepted and change nothing.
#[derive(Debug)]
pub struct GameEngine {
    mode: Mode,
    mine_layout: MineLayout,
    board: Array2<CellState>,
    revealed_safe_count: CellCount,
    started: bool,
    ended: bool,
    outcome: Outcome,
    timer: Timer,
}

impl GameEngine {
    /// Starts a game on a freshly generated random layout.
    pub fn new(mode: Mode) -> Result<Self> {
        Self::with_generator(mode, RandomMinefieldGenerator::from_entropy())
    }

    pub fn with_generator(mode: Mode, generator: impl MinefieldGenerator) -> Result<Self> {
        mode.validate()?;
        let mine_layout = generator.generate(&mode);
        Self::with_layout(mode, mine_layout)
    }

    /// Starts a game on a known layout, which has to match the mode's size and mine count.
    pub fn with_layout(mode: Mode, mine_layout: MineLayout) -> Result<Self> {
        mode.validate()?;
        if mine_layout.size() != mode.size() || mine_layout.mine_count() != mode.mines {
            return Err(GameError::InvalidMode);
        }

        log::debug!("New game: {}", mode);
        Ok(Self {
            board: Array2::default(grid_index(mode.size())),
            mode,
            mine_layout,
            revealed_safe_count: 0,
            started: false,
            ended: false,
            outcome: Outcome::Ongoing,
            timer: Timer::new(),
        })
    }

    /// Replaces the game timer, e.g. to install a tick callback or a different interval.
    pub fn with_timer(mut self, mut timer: Timer) -> Self {
        timer.reset();
        self.timer = timer;
        self
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn size(&self) -> Coord2 {
        self.mode.size()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.mine_layout.safe_cell_count()
    }

    /// Mine count shown to the player. Flags do not decrease it.
    pub fn mines_display(&self) -> CellCount {
        self.mode.mines
    }

    /// Whether the view should show where the mines are, true once the game is over.
    pub fn mines_exposed(&self) -> bool {
        self.ended
    }

    /// Whether a restart would throw away a game in progress.
    pub fn needs_confirmation(&self) -> bool {
        self.started && !self.ended
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.mode.validate_coords(coords)?;
        Ok(Cell {
            has_mine: self.mine_layout[coords],
            state: self.board[grid_index(coords)],
        })
    }

    pub fn is_mine(&self, coords: Coord2) -> Result<bool> {
        let coords = self.mode.validate_coords(coords)?;
        Ok(self.mine_layout[coords])
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> Result<u8> {
        let coords = self.mode.validate_coords(coords)?;
        Ok(self.mine_layout.adjacent_mine_count(coords))
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_layout.mine_coords()
    }

    /// Forwards one elapsed interval to the game timer.
    pub fn tick(&mut self) -> Option<u32> {
        let duration = self.timer.tick()?;
        log::trace!("tick: {}", duration);
        Some(duration)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<ChangeSet> {
        let coords = self.mode.validate_coords(coords)?;

        if self.ended || self.board[grid_index(coords)].is_revealed() {
            return Ok(ChangeSet::unchanged(self.outcome));
        }

        self.mark_started();

        if self.mine_layout[coords] {
            log::debug!("Hit mine at {:?}", coords);
            self.board[grid_index(coords)] = CellState::Revealed;
            let mut changes = ChangeSet {
                changed: vec![coords],
                ..Default::default()
            };
            self.end_game(Outcome::Lost, &mut changes);
            return Ok(changes);
        }

        let mut changes = ChangeSet::default();
        self.flood_reveal(coords, &mut changes.changed);

        if self.revealed_safe_count == self.mine_layout.safe_cell_count() {
            self.end_game(Outcome::Won, &mut changes);
        }
        changes.outcome = self.outcome;
        Ok(changes)
    }

    /// Marks a hidden cell. Flags stay until the cell is revealed.
    pub fn flag(&mut self, coords: Coord2) -> Result<ChangeSet> {
        let coords = self.mode.validate_coords(coords)?;

        if self.ended || self.board[grid_index(coords)] != CellState::Hidden {
            return Ok(ChangeSet::unchanged(self.outcome));
        }

        log::trace!("flag {:?}", coords);
        self.board[grid_index(coords)] = CellState::Flagged;
        Ok(ChangeSet {
            changed: vec![coords],
            outcome: self.outcome,
            ..Default::default()
        })
    }

    pub fn give_up(&mut self) -> ChangeSet {
        let mut changes = ChangeSet::unchanged(self.outcome);
        if !self.ended {
            log::debug!("Gave up after {} ticks", self.timer.duration());
            self.end_game(Outcome::Lost, &mut changes);
        }
        changes
    }

    /// Hides every cell again and resets the timer. The mine layout is kept.
    pub fn restart(&mut self) {
        log::debug!("Restarting {}", self.mode);
        self.timer.reset();
        self.board.fill(CellState::Hidden);
        self.revealed_safe_count = 0;
        self.started = false;
        self.ended = false;
        self.outcome = Outcome::Ongoing;
    }

    /// Reveals `start` and spreads over orthogonal neighbors from every cell with no
    /// adjacent mines. Cells are revealed as they are queued, so none is queued twice.
    fn flood_reveal(&mut self, start: Coord2, changed: &mut Vec<Coord2>) {
        self.reveal_safe_cell(start, changed);
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            if self.mine_layout.adjacent_mine_count(visit_coords) != 0 {
                continue;
            }

            for pos in neighbors(visit_coords, self.mode.size()) {
                if self.board[grid_index(pos)].is_revealed() || self.mine_layout[pos] {
                    continue;
                }
                self.reveal_safe_cell(pos, changed);
                to_visit.push_back(pos);
            }
        }
    }

    fn reveal_safe_cell(&mut self, coords: Coord2, changed: &mut Vec<Coord2>) {
        log::trace!("reveal {:?}", coords);
        self.board[grid_index(coords)] = CellState::Revealed;
        self.revealed_safe_count += 1;
        changed.push(coords);
    }

    fn mark_started(&mut self) {
        if !self.started {
            log::debug!("Game started");
            self.started = true;
            self.timer.start();
        }
    }

    fn end_game(&mut self, outcome: Outcome, changes: &mut ChangeSet) {
        log::debug!("Game over: {:?} after {} ticks", outcome, self.timer.duration());
        self.ended = true;
        self.outcome = outcome;
        self.timer.stop();

        changes.outcome = outcome;
        changes.exposed_mines = self.mine_layout.mine_coords().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn mode(width: Coord, height: Coord, mines: CellCount) -> Mode {
        Mode::custom("Test", width, height, mines).unwrap()
    }

    fn engine(size: Coord2, mines: &[Coord2]) -> GameEngine {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        let mode = mode(size.0, size.1, layout.mine_count());
        GameEngine::with_layout(mode, layout).unwrap()
    }

    fn snapshot(engine: &GameEngine) -> Vec<Cell> {
        let (size_x, size_y) = engine.size();
        (0..size_y)
            .flat_map(|y| (0..size_x).map(move |x| (x, y)))
            .map(|coords| engine.cell(coords).unwrap())
            .collect()
    }

    fn state(engine: &GameEngine, coords: Coord2) -> CellState {
        engine.cell(coords).unwrap().state
    }

    #[test]
    fn new_game_is_hidden_and_not_started() {
        let engine = GameEngine::new(Mode::EASY).unwrap();

        assert!(!engine.is_started());
        assert!(!engine.is_ended());
        assert!(!engine.timer().is_running());
        assert_eq!(engine.mine_coords().count(), 10);
        assert!(snapshot(&engine).iter().all(|cell| cell.state == CellState::Hidden));
    }

    #[test]
    fn invalid_modes_are_rejected() {
        let crowded = Mode {
            name: "Crowded".into(),
            width: 2,
            height: 2,
            mines: 5,
        };
        assert_eq!(GameEngine::new(crowded).err(), Some(GameError::InvalidMode));

        let empty = Mode {
            name: "Empty".into(),
            width: 0,
            height: 3,
            mines: 0,
        };
        assert_eq!(GameEngine::new(empty).err(), Some(GameError::InvalidMode));
    }

    #[test]
    fn layout_must_match_mode() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0)]).unwrap();
        assert_eq!(
            GameEngine::with_layout(mode(3, 3, 2), layout.clone()).err(),
            Some(GameError::InvalidMode)
        );
        assert_eq!(
            GameEngine::with_layout(mode(4, 3, 1), layout).err(),
            Some(GameError::InvalidMode)
        );
    }

    #[test]
    fn fixed_generator_replays_a_layout() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(1, 1)]).unwrap();
        let generator = FixedMinefieldGenerator::new(layout);
        let mut engine = GameEngine::with_generator(mode(3, 3, 1), generator).unwrap();

        assert_eq!(engine.is_mine((1, 1)), Ok(true));
        assert_eq!(engine.reveal((1, 1)).unwrap().outcome, Outcome::Lost);
    }

    #[test]
    fn mine_free_strip_is_won_in_one_reveal() {
        let mut engine = engine((2, 1), &[]);

        let changes = engine.reveal((0, 0)).unwrap();

        assert_eq!(changes.outcome, Outcome::Won);
        assert_eq!(changes.changed, vec![(0, 0), (1, 0)]);
        assert_eq!(state(&engine, (1, 0)), CellState::Revealed);
        assert!(engine.is_ended());
        assert!(!engine.timer().is_running());
    }

    #[test]
    fn mine_free_board_reveals_everything() {
        let mut engine = engine((7, 5), &[]);

        let changes = engine.reveal((3, 2)).unwrap();

        assert_eq!(changes.outcome, Outcome::Won);
        assert_eq!(changes.changed.len(), 35);
        assert_eq!(engine.revealed_safe_count(), 35);
    }

    #[test]
    fn diagonal_mine_does_not_stop_the_cascade() {
        let mut engine = engine((3, 3), &[(1, 1)]);

        let changes = engine.reveal((0, 0)).unwrap();

        assert_eq!(changes.outcome, Outcome::Ongoing);
        assert_eq!(engine.adjacent_mine_count((0, 0)), Ok(0));
        assert_eq!(changes.changed, vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(engine.adjacent_mine_count((1, 0)), Ok(1));
        assert_eq!(engine.adjacent_mine_count((0, 1)), Ok(1));
        assert_eq!(state(&engine, (2, 0)), CellState::Hidden);
        assert_eq!(state(&engine, (1, 1)), CellState::Hidden);
    }

    #[test]
    fn revealing_a_mine_loses() {
        let mut engine = engine((3, 3), &[(1, 1)]);
        engine.reveal((0, 0)).unwrap();

        let changes = engine.reveal((1, 1)).unwrap();

        assert_eq!(changes.outcome, Outcome::Lost);
        assert_eq!(changes.changed, vec![(1, 1)]);
        assert_eq!(changes.exposed_mines, vec![(1, 1)]);
        assert_eq!(state(&engine, (1, 1)), CellState::Revealed);
        assert!(engine.is_ended());
        assert!(engine.mines_exposed());
        assert!(!engine.timer().is_running());
        assert_eq!(engine.revealed_safe_count(), 3);
    }

    #[test]
    fn first_reveal_on_a_mine_starts_and_ends() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        let changes = engine.reveal((0, 0)).unwrap();

        assert_eq!(changes.outcome, Outcome::Lost);
        assert!(engine.is_started());
        assert!(!engine.needs_confirmation());
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut once = engine((4, 4), &[(3, 3), (1, 2)]);
        let mut twice = engine((4, 4), &[(3, 3), (1, 2)]);

        once.reveal((0, 0)).unwrap();
        twice.reveal((0, 0)).unwrap();
        let second = twice.reveal((0, 0)).unwrap();

        assert!(!second.has_update());
        assert_eq!(snapshot(&once), snapshot(&twice));
        assert_eq!(once.revealed_safe_count(), twice.revealed_safe_count());
    }

    #[test]
    fn win_requires_every_safe_cell() {
        let mut engine = engine((3, 1), &[(1, 0)]);

        assert_eq!(engine.reveal((0, 0)).unwrap().outcome, Outcome::Ongoing);
        assert!(!engine.is_ended());

        let changes = engine.reveal((2, 0)).unwrap();
        assert_eq!(changes.outcome, Outcome::Won);
        assert_eq!(changes.exposed_mines, vec![(1, 0)]);
        assert_eq!(engine.revealed_safe_count(), engine.safe_cell_count());
    }

    #[test]
    fn full_board_can_only_be_lost() {
        let mut engine = engine((2, 2), &[(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(engine.safe_cell_count(), 0);

        assert_eq!(engine.reveal((1, 1)).unwrap().outcome, Outcome::Lost);
    }

    #[test]
    fn out_of_bounds_is_an_error_and_changes_nothing() {
        let mut engine = engine((3, 3), &[(1, 1)]);

        assert_eq!(engine.reveal((3, 0)), Err(GameError::OutOfBounds));
        assert_eq!(engine.flag((0, 3)), Err(GameError::OutOfBounds));
        assert_eq!(engine.cell((9, 9)), Err(GameError::OutOfBounds));
        assert_eq!(engine.is_mine((3, 3)), Err(GameError::OutOfBounds));
        assert!(!engine.is_started());
    }

    #[test]
    fn actions_after_end_are_ignored() {
        let mut engine = engine((3, 3), &[(1, 1)]);
        engine.reveal((1, 1)).unwrap();
        let before = snapshot(&engine);

        let reveal = engine.reveal((0, 0)).unwrap();
        let flag = engine.flag((2, 2)).unwrap();
        let give_up = engine.give_up();

        assert!(!reveal.has_update());
        assert!(!flag.has_update());
        assert!(!give_up.has_update());
        assert_eq!(reveal.outcome, Outcome::Lost);
        assert_eq!(snapshot(&engine), before);
    }

    #[test]
    fn flags_are_one_way_until_revealed() {
        let mut engine = engine((3, 1), &[(2, 0)]);

        assert_eq!(engine.flag((0, 0)).unwrap().changed, vec![(0, 0)]);
        assert!(!engine.flag((0, 0)).unwrap().has_update());
        assert_eq!(state(&engine, (0, 0)), CellState::Flagged);
        assert!(!engine.is_started());
        assert_eq!(engine.mines_display(), 1);

        engine.reveal((0, 0)).unwrap();
        assert_eq!(state(&engine, (0, 0)), CellState::Revealed);
        assert!(!engine.flag((0, 0)).unwrap().has_update());
    }

    #[test]
    fn cascade_reveals_flagged_neighbors() {
        let mut engine = engine((3, 3), &[(2, 2)]);
        engine.flag((1, 0)).unwrap();

        engine.reveal((0, 0)).unwrap();

        assert_eq!(state(&engine, (1, 0)), CellState::Revealed);
        assert_eq!(state(&engine, (2, 2)), CellState::Hidden);
    }

    #[test]
    fn give_up_loses_and_exposes_mines() {
        let mut engine = engine((3, 3), &[(0, 2), (2, 0)]);
        engine.reveal((0, 0)).unwrap();

        let changes = engine.give_up();

        assert_eq!(changes.outcome, Outcome::Lost);
        assert_eq!(changes.exposed_mines, vec![(2, 0), (0, 2)]);
        assert!(changes.changed.is_empty());
        assert!(engine.is_ended());
        assert!(!engine.timer().is_running());
        assert_eq!(state(&engine, (2, 0)), CellState::Hidden);
    }

    #[test]
    fn timer_runs_from_first_reveal() {
        let mut engine = engine((4, 1), &[(1, 0)]);
        assert_eq!(engine.tick(), None);

        assert_eq!(engine.reveal((3, 0)).unwrap().outcome, Outcome::Ongoing);
        assert!(engine.timer().is_running());
        assert_eq!(engine.tick(), Some(1));
        assert_eq!(engine.tick(), Some(2));
        assert_eq!(engine.timer().duration(), 2);
    }

    #[test]
    fn restart_keeps_mines_and_clears_progress() {
        let mut engine = engine((3, 3), &[(1, 1)]);
        engine.flag((2, 2)).unwrap();
        engine.reveal((0, 0)).unwrap();
        engine.tick();
        assert!(engine.needs_confirmation());

        engine.restart();

        assert!(!engine.needs_confirmation());
        assert!(!engine.is_started());
        assert_eq!(engine.outcome(), Outcome::Ongoing);
        assert_eq!(engine.revealed_safe_count(), 0);
        assert_eq!(engine.timer().duration(), 0);
        assert!(!engine.timer().is_running());
        assert!(snapshot(&engine).iter().all(|cell| cell.state == CellState::Hidden));
        assert_eq!(engine.mine_coords().collect::<Vec<_>>(), vec![(1, 1)]);
    }

    #[test]
    fn restart_after_loss_allows_play_again() {
        let mut engine = engine((3, 1), &[(0, 0)]);
        engine.reveal((0, 0)).unwrap();

        engine.restart();

        assert!(!engine.is_ended());
        assert_eq!(engine.reveal((2, 0)).unwrap().outcome, Outcome::Won);
    }

    #[test]
    fn installed_timer_receives_ticks() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut timer = Timer::new();
        {
            let seen = seen.clone();
            timer.on_tick(move |duration| seen.lock().unwrap().push(duration));
        }
        let mut engine = engine((4, 1), &[(1, 0)]).with_timer(timer);

        engine.reveal((3, 0)).unwrap();
        engine.tick();
        engine.tick();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn change_set_serializes_for_views() {
        let mut engine = engine((2, 1), &[]);
        let changes = engine.reveal((1, 0)).unwrap();

        let json = serde_json::to_value(&changes).unwrap();

        assert_eq!(json["outcome"], "Won");
        assert_eq!(json["changed"], serde_json::json!([[1, 0], [0, 0]]));
    }

    proptest! {
        #[test]
        fn revealed_count_tracks_the_board(
            width in 1u8..=12,
            height in 1u8..=12,
            mines in 0u16..=40,
            seed in any::<u64>(),
            actions in prop::collection::vec((any::<bool>(), 0u8..14, 0u8..14), 1..60),
        ) {
            let mines = mines.min(u16::from(width) * u16::from(height));
            let mode = mode(width, height, mines);
            let mut engine =
                GameEngine::with_generator(mode.clone(), RandomMinefieldGenerator::new(seed)).unwrap();

            for (is_reveal, x, y) in actions {
                let ended_before = engine.is_ended();
                let result = if is_reveal { engine.reveal((x, y)) } else { engine.flag((x, y)) };

                let Ok(changes) = result else {
                    prop_assert!(!mode.contains((x, y)));
                    continue;
                };
                prop_assert!(mode.contains((x, y)));

                let distinct: HashSet<_> = changes.changed.iter().copied().collect();
                prop_assert_eq!(distinct.len(), changes.changed.len());
                if ended_before {
                    prop_assert!(!changes.has_update());
                }

                let revealed_safe = snapshot(&engine)
                    .iter()
                    .filter(|cell| cell.state.is_revealed() && !cell.has_mine)
                    .count();
                prop_assert_eq!(usize::from(engine.revealed_safe_count()), revealed_safe);
                prop_assert!(engine.revealed_safe_count() <= engine.safe_cell_count());
                prop_assert_eq!(changes.outcome, engine.outcome());

                if engine.outcome() == Outcome::Won {
                    prop_assert_eq!(engine.revealed_safe_count(), engine.safe_cell_count());
                }
            }
        }
    }
}
