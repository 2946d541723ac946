use threes_ai::bot::Bot;
use threes_ai::eval::OpennessMatthew;
use threes_ai::selfplay::Game;

fn main() {
    let bot = Bot::new(6, 3, Box::new(OpennessMatthew)).expect("valid bot configuration");
    let mut rng = rand::thread_rng();
    let mut game = Game::new(&mut rng);
    println!("bot: {}", bot.describe());
    println!("{}", game.board());
    let mut move_count = 0u32;
    let mut total_evals = 0u64;
    let mut peak_evals = 0u64;
    while !game.is_over() {
        let (dir, evals) = bot.get_next_move_counted(game.board(), game.deck(), game.hint());
        let Some(dir) = dir else {
            break;
        };
        game.advance(dir, &mut rng);
        move_count += 1;
        total_evals = total_evals.saturating_add(evals);
        peak_evals = peak_evals.max(evals);
        println!("move {}: {} (next: {:?})", move_count, dir, game.hint());
        println!("{}", game.board());
    }
    println!(
        "Game over. Moves: {}, score: {}, highest card: {}, moves evaluated: {} (peak {})",
        move_count,
        game.score(),
        game.highest_card(),
        total_evals,
        peak_evals
    );
}
