use super::*;

/// Places mines uniformly at random without replacement.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, mode: &Mode) -> MineLayout {
        use ndarray::Array2;
        use rand::prelude::*;

        let size = mode.size();
        let total_cells = mode.total_cells();

        let mines = if mode.mines > total_cells {
            log::warn!(
                "Minefield already full, requested {} but only fits {}",
                mode.mines,
                total_cells
            );
            total_cells
        } else {
            mode.mines
        };

        let mut mine_mask: Array2<bool> = Array2::default(grid_index(size));
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let width = usize::from(mode.width);

        for index in rand::seq::index::sample(&mut rng, total_cells.into(), mines.into()) {
            // row-major, same as `Mode::linear_index`
            mine_mask[[index % width, index / width]] = true;
        }

        let layout = MineLayout::from_sized_mask(mine_mask);
        log::trace!(
            "Generated {} mines on {}x{} with seed {}",
            layout.mine_count(),
            size.0,
            size.1,
            self.seed
        );
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn raw_mode(width: Coord, height: Coord, mines: CellCount) -> Mode {
        Mode {
            name: "Test".into(),
            width,
            height,
            mines,
        }
    }

    #[test]
    fn generates_the_requested_number_of_mines() {
        let layout = RandomMinefieldGenerator::new(7).generate(&raw_mode(10, 10, 90));
        assert_eq!(layout.mine_count(), 90);
    }

    #[test]
    fn mine_count_is_capped_by_board_size() {
        let layout = RandomMinefieldGenerator::new(7).generate(&raw_mode(5, 5, 90));
        assert_eq!(layout.mine_count(), 25);
        assert_eq!(layout.safe_cell_count(), 0);
    }

    #[test]
    fn same_seed_same_layout() {
        let first = RandomMinefieldGenerator::new(42).generate(&Mode::HARD);
        let second = RandomMinefieldGenerator::new(42).generate(&Mode::HARD);
        assert_eq!(first, second);
    }

    #[test]
    fn layout_matches_mode_size() {
        let layout = RandomMinefieldGenerator::new(1).generate(&Mode::HARD);
        assert_eq!(layout.size(), (30, 16));
        assert_eq!(layout.mine_count(), 99);
    }

    proptest! {
        #[test]
        fn mine_count_is_min_of_requested_and_cells(
            width in 1u8..=40,
            height in 1u8..=40,
            mines in 0u16..=2000,
            seed in any::<u64>(),
        ) {
            let mode = raw_mode(width, height, mines);
            let layout = RandomMinefieldGenerator::new(seed).generate(&mode);
            prop_assert_eq!(layout.mine_count(), mines.min(mode.total_cells()));
        }

        #[test]
        fn mines_are_distinct_and_in_bounds(
            width in 1u8..=30,
            height in 1u8..=30,
            mines in 0u16..=900,
            seed in any::<u64>(),
        ) {
            let mode = raw_mode(width, height, mines);
            let layout = RandomMinefieldGenerator::new(seed).generate(&mode);
            let coords: Vec<_> = layout.mine_coords().collect();
            let distinct: HashSet<_> = coords.iter().copied().collect();

            prop_assert_eq!(coords.len(), distinct.len());
            prop_assert_eq!(coords.len(), usize::from(layout.mine_count()));
            for coords in coords {
                prop_assert!(mode.contains(coords));
            }
        }
    }
}
