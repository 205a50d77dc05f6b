//! # Damage Authority Drill
//!
//! Runs a host and two clients over the in-process loopback transport and
//! checks that:
//! 1. Client damage is forwarded, never applied locally
//! 2. The host clamps health and records the attacker
//! 3. Every process sees exactly one death per life
//! 4. Hit feedback reaches the owning client only
//! 5. Healing never revives
//!
//! Exit code is non-zero if any scenario fails.

use bastion_authority::DamageDrill;

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         BASTION - DAMAGE AUTHORITY DRILL                         ║");
    println!("║         Host + 2 clients over loopback                           ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  Target: every scenario settles in < 50ms                        ║");
    println!("║                                                                  ║");
    println!("║  Flow: Client → Host (apply) → Broadcast → Owner feedback       ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");

    let mut drill = DamageDrill::new();
    drill.run_all();
    drill.print_results();

    if drill.all_passed() {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}
