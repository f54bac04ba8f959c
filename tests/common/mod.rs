#![allow(dead_code)]

use adfgvx::cipher::text::plain_symbols;
use adfgvx::config::Config;
use adfgvx::scorer::QuadgramModel;
use std::sync::OnceLock;

/// English training text shared by the integration tests.
pub const CORPUS: &str = "\
When in the course of human events it becomes necessary for one people to dissolve the \
political bands which have connected them with another and to assume among the powers of \
the earth the separate and equal station to which the laws of nature and of nature's God \
entitle them a decent respect to the opinions of mankind requires that they should declare \
the causes which impel them to the separation. We hold these truths to be self evident that \
all men are created equal that they are endowed by their creator with certain unalienable \
rights that among these are life liberty and the pursuit of happiness. That to secure these \
rights governments are instituted among men deriving their just powers from the consent of \
the governed. That whenever any form of government becomes destructive of these ends it is \
the right of the people to alter or to abolish it and to institute new government laying its \
foundation on such principles and organizing its powers in such form as to them shall seem \
most likely to effect their safety and happiness. Prudence indeed will dictate that \
governments long established should not be changed for light and transient causes and \
accordingly all experience hath shewn that mankind are more disposed to suffer while evils \
are sufferable than to right themselves by abolishing the forms to which they are \
accustomed. But when a long train of abuses and usurpations pursuing invariably the same \
object evinces a design to reduce them under absolute despotism it is their right it is \
their duty to throw off such government and to provide new guards for their future \
security. Such has been the patient sufferance of these colonies and such is now the \
necessity which constrains them to alter their former systems of government. \
Four score and seven years ago our fathers brought forth on this continent a new nation \
conceived in liberty and dedicated to the proposition that all men are created equal. Now \
we are engaged in a great civil war testing whether that nation or any nation so conceived \
and so dedicated can long endure. We are met on a great battle field of that war. We have \
come to dedicate a portion of that field as a final resting place for those who here gave \
their lives that that nation might live. It is altogether fitting and proper that we should \
do this. But in a larger sense we can not dedicate we can not consecrate we can not hallow \
this ground. The brave men living and dead who struggled here have consecrated it far above \
our poor power to add or detract. The world will little note nor long remember what we say \
here but it can never forget what they did here. It is for us the living rather to be \
dedicated here to the unfinished work which they who fought here have thus far so nobly \
advanced. It is rather for us to be here dedicated to the great task remaining before us \
that from these honored dead we take increased devotion to that cause for which they gave \
the last full measure of devotion that we here highly resolve that these dead shall not \
have died in vain that this nation under God shall have a new birth of freedom and that \
government of the people by the people for the people shall not perish from the earth. \
The old lighthouse keeper climbed the stairs every evening at the same hour. There were one \
hundred and twelve steps from the door at the bottom to the lamp room at the top and he \
knew each of them by the sound it made under his boots. In the winter the wind came off the \
water with such force that the whole tower seemed to lean against it and the glass of the \
lantern hummed like a struck bell. He trimmed the wick and polished the lens and wrote the \
weather in a narrow book that had belonged to the keeper before him. Ships passed in the \
night without knowing his name and he preferred it that way. On clear nights he could see \
the lights of the town across the bay and sometimes the lights of a train moving slowly \
along the coast toward the city in the north. In the morning he slept for a few hours and \
then walked down to the harbor to buy bread and fish and to hear what the fishermen had to \
say about the sea. They spoke of the weather and the price of fuel and of the boats that \
had gone out and not come back. He listened more than he talked. When the supply boat came \
at the end of each month it brought oil for the lamp and letters from his sister who lived \
inland and who wrote about her garden and her children and the long dry summers. He \
answered every letter on the same day and gave his reply to the boatman before the tide \
turned. \
The river begins as a thin stream of melted snow high in the mountains and gathers strength \
as it descends through the forest. By the time it reaches the valley it is wide enough to \
carry timber and deep enough to drown a careless horse. Farmers along its banks have learned \
to read its moods. In spring the water rises and spreads across the low fields leaving a \
layer of dark soil that makes the harvest rich. In late summer the river shrinks to a slow \
brown ribbon and the children wade across it to reach the orchards on the other side. The \
mill at the bend has stood there for more than two hundred years. Its wheel no longer turns \
but the building has become a school where the history of the valley is taught to anyone \
who wants to learn it. The teacher there likes to say that the river has no memory but the \
people who live beside it remember everything. They remember the flood that carried away the \
bridge and the drought that emptied the wells and the winter when the water froze so hard \
that a wagon could cross from one bank to the other. \
Mathematics is the study of patterns and the reasoning that connects them. A student who \
learns to add and subtract is already learning to recognize structure in the world. Later \
the same student meets fractions and equations and finds that the rules which govern small \
numbers also govern large ones. Geometry teaches that a simple statement about triangles \
can be proved from a handful of axioms and that the proof will hold in every corner of the \
plane. Algebra teaches that an unknown quantity can be named and manipulated before it is \
found. Probability teaches that uncertainty itself can be measured. None of these ideas \
is obvious and each of them took centuries to develop. Yet once they are understood they \
seem natural and it becomes difficult to imagine thinking without them. That is perhaps \
the most remarkable feature of mathematical knowledge. It changes the mind that holds it. \
The secret message was written in a code that the soldiers had practiced for weeks. Each \
letter was replaced by a pair of symbols taken from a square of thirty six cells and the \
resulting string was then written into the columns of a table under a key word. The columns \
were rearranged in the alphabetical order of the key and read off from top to bottom. The \
officers believed that no enemy could read such a message without the key and for a time \
they were right. But a patient analyst working through the night noticed that some \
columns looked alike while others did not and from that small observation he rebuilt the \
whole table. By morning he could read the orders of the enemy army and the outcome of the \
battle was decided before it began. \
";

/// Normalized plaintext symbols of [`CORPUS`].
pub fn corpus_symbols() -> Vec<u8> {
    plain_symbols(CORPUS)
}

/// Model trained once on [`CORPUS`] and shared by every test in a binary.
pub fn model() -> &'static QuadgramModel {
    static MODEL: OnceLock<QuadgramModel> = OnceLock::new();
    MODEL.get_or_init(|| QuadgramModel::from_corpus(CORPUS).expect("corpus is not empty"))
}

/// Configuration sized for tests: fewer restarts than the CLI default.
pub fn test_config(key_length: usize) -> Config {
    let mut config = Config::default();
    config.analysis.key_length = key_length;
    config.search.restarts = 6;
    config
}

/// Square whose rows and columns give the coordinate columns clearly
/// different profiles on 400-symbol samples of [`CORPUS`].
pub const TEST_SQUARE: &str = "WON9GXQ2KRTSU543ALB6HD0ZJVIMF7YP8EC1";

/// Transposition key used with [`TEST_SQUARE`].
pub const TEST_KEY: [usize; 8] = [3, 6, 0, 5, 1, 7, 2, 4];

/// Row-coordinate columns and true pairs of the ciphertext grid for `key`.
pub fn truth(key: &[usize]) -> (Vec<usize>, Vec<(usize, usize)>) {
    let mut rows: Vec<usize> = key.iter().step_by(2).copied().collect();
    rows.sort_unstable();
    let pairs = key.chunks(2).map(|c| (c[0], c[1])).collect();
    (rows, pairs)
}

/// Share of positions where two strings agree.
pub fn accuracy(expected: &str, found: &str) -> f64 {
    let hits = expected.bytes().zip(found.bytes()).filter(|(a, b)| a == b).count();
    hits as f64 / expected.len().max(1) as f64
}
