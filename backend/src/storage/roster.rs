//! The fixed companion roster
//!
//! Reference data seeded once at startup: three companions per flavor
//! category. Ids are stable; sprites live under the static asset path.

use shared::{Companion, CompanionStats, FlavorCategory};

fn companion(
    id: i32,
    name: &str,
    category: FlavorCategory,
    stats: (i32, i32, i32, i32, i32),
    description: &str,
) -> Companion {
    let (energy, boldness, depth, brightness, finesse) = stats;
    Companion {
        id,
        name: name.to_string(),
        category,
        sprite_path: format!("/sprites/{:03}.png", id),
        base_stats: CompanionStats {
            energy,
            boldness,
            depth,
            brightness,
            finesse,
        },
        description: description.to_string(),
    }
}

/// The full default roster, in id order
pub fn default_roster() -> Vec<Companion> {
    use FlavorCategory::*;

    vec![
        companion(1, "Evenbrew", Balanced, (60, 55, 60, 55, 60),
            "A calm creature that settles anywhere; its mood never swings far in either direction."),
        companion(2, "Steadipip", Balanced, (65, 50, 55, 50, 55),
            "Keeps a perfectly even temperature through its round body; cafes consider it a good omen."),
        companion(3, "Mellowl", Balanced, (55, 45, 65, 50, 60),
            "Dozes through the afternoon and wakes only for the first pour of the day."),
        companion(4, "Emberling", Roasted, (70, 85, 60, 40, 45),
            "Sparks drift from its fur when it is excited; it naps in warm roaster exhaust."),
        companion(5, "Charkin", Roasted, (65, 90, 70, 30, 40),
            "Its shell is striped like cracked bean parchment; it chews on charred oak for fun."),
        companion(6, "Smolderbean", Roasted, (75, 80, 65, 35, 50),
            "Glows faintly in the dark and smells of toast; handlers report a peppery temper."),
        companion(7, "Dewdrip", Crisp, (50, 35, 40, 80, 75),
            "Condenses from cold morning air; anything it touches tastes cleaner afterward."),
        companion(8, "Clearfin", Crisp, (55, 30, 45, 85, 70),
            "Swims in rinse water without leaving a ripple; spotless cups are its territory."),
        companion(9, "Rinsel", Crisp, (45, 40, 35, 75, 80),
            "Polishes pebbles to a mineral shine; it refuses murky puddles outright."),
        companion(10, "Jasmira", Floral, (55, 35, 45, 70, 90),
            "Trails a jasmine scent wherever it floats; gardens bloom a little early around it."),
        companion(11, "Petalon", Floral, (50, 40, 50, 65, 85),
            "Sheds soft petals when startled; collectors prize cups it has hovered over."),
        companion(12, "Rosaleaf", Floral, (60, 30, 40, 70, 85),
            "Weaves rose stems into its mane; its tea-like calm spreads to everyone nearby."),
        companion(13, "Zestrix", Citrus, (65, 45, 30, 95, 70),
            "Crackles with static when citrus is peeled nearby; it cannot sit still."),
        companion(14, "Limelit", Citrus, (70, 40, 25, 90, 75),
            "Glows a sharp green under morning light; its chirp is bright enough to wake a street."),
        companion(15, "Brightbud", Citrus, (60, 50, 30, 85, 65),
            "Sprouts tiny sparks instead of leaves; grazing it feels like biting a grapefruit."),
        companion(16, "Mentholo", Cooling, (50, 40, 45, 80, 85),
            "Exhales a cooling mist; its den always smells faintly of eucalyptus."),
        companion(17, "Frostleaf", Cooling, (45, 35, 50, 75, 90),
            "Frost patterns crawl across its leaves even in summer; it hums when the air is clean."),
        companion(18, "Coolwisp", Cooling, (55, 30, 40, 85, 80),
            "A wisp that drifts out of freezers at night; it leaves a mint chill on the tongue."),
        companion(19, "Fermyn", Funky, (70, 75, 80, 45, 55),
            "Thrives in fermentation tanks; its markings change pattern every few days."),
        companion(20, "Funkaroo", Funky, (75, 70, 75, 50, 50),
            "Bounds between cellar barrels; no two observers describe its smell the same way."),
        companion(21, "Feralroot", Funky, (65, 80, 85, 40, 45),
            "A tangle of wild roots that ferments fallen fruit inside its hollow trunk."),
        companion(22, "Loamling", Earthy, (60, 60, 90, 30, 40),
            "Burrows through rich soil and surfaces dusted in cocoa-colored earth."),
        companion(23, "Grainwick", Earthy, (65, 55, 85, 35, 45),
            "Smells of warm cereal; farmers leave it wheat stalks as thanks for turned fields."),
        companion(24, "Hazelburr", Earthy, (55, 65, 80, 30, 50),
            "Hoards hazelnuts in its burr-covered coat and cracks them with a heavy, slow bite."),
        companion(25, "Peachit", Stonefruit, (70, 45, 55, 60, 75),
            "Its fuzzy skin bruises like ripe fruit, so it is handled only with soft cloth."),
        companion(26, "Plumkin", Stonefruit, (65, 50, 60, 55, 70),
            "Round and heavy as a late-season plum; it ripens in sweetness as it dozes."),
        companion(27, "Nectarling", Stonefruit, (75, 40, 50, 65, 80),
            "Drips a syrup said to taste of apricot; orchard keepers follow it to the best trees."),
        companion(28, "Cocoabat", Cocoa, (60, 85, 75, 30, 45),
            "Roosts in roastery rafters; its wings leave a bittersweet dust behind."),
        companion(29, "Nibbin", Cocoa, (55, 80, 80, 25, 50),
            "Gnaws cacao nibs into perfect squares and stacks them in dark corners."),
        companion(30, "Boldbrew", Cocoa, (65, 90, 70, 30, 40),
            "Stares down anything weaker than a double shot; it only drinks from black cups."),
        companion(31, "Sugarpuff", Confection, (80, 30, 40, 70, 85),
            "A cloud of spun sugar that grows denser the happier it gets."),
        companion(32, "Caramelo", Confection, (85, 35, 50, 60, 80),
            "Moves in slow golden ripples; anything it rests on comes away slightly sticky."),
        companion(33, "Vanillit", Confection, (75, 25, 45, 65, 90),
            "Its scent is strongest at dusk; bakers insist cakes rise better when it watches."),
        companion(34, "Mystiq", Enigmatic, (60, 50, 70, 75, 95),
            "Appears only to tasters who describe a cup no one else can perceive."),
        companion(35, "Aromara", Enigmatic, (55, 45, 65, 80, 90),
            "Weaves visible ribbons of aroma in still air; the patterns never repeat."),
        companion(36, "Phantasip", Enigmatic, (65, 40, 75, 70, 85),
            "Sips from cups left unattended and leaves them tasting impossibly precise."),
        companion(37, "Cinnaroo", Spiced, (70, 60, 55, 50, 65),
            "Its tail curls like cinnamon bark; it drums warm rhythms on winter mornings."),
        companion(38, "Clovelet", Spiced, (65, 65, 60, 45, 60),
            "Small but pungent; one clove-scented nip keeps larger creatures respectful."),
        companion(39, "Chaiwick", Spiced, (75, 55, 50, 55, 70),
            "Simmers with gentle heat; travelers trade stories for a seat beside it."),
    ]
}
