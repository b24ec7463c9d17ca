//! Encrypts one text block, prints every round, and decrypts it back.

use aes_core::text::{format_block_hex, recover_text, text_to_block};
use aes_core::{decrypt_block, encrypt_block_with, expand_key, Aes128Key, RoundTrace};

fn main() {
    let key = Aes128Key::from_text("YELLOW SUBMARINE").unwrap();
    let block = text_to_block("ATTACK AT DAWN!!").unwrap();

    let schedule = expand_key(&key);
    let ciphertext = encrypt_block_with(&block, &schedule, &mut |t: &RoundTrace<'_>| {
        println!("round {:>2}\n{}\n", t.round, t.state);
    });

    let recovered = decrypt_block(&ciphertext, &key);
    assert_eq!(recovered, block);

    println!("ciphertext: {}", format_block_hex(&ciphertext));
    println!("recovered: {}", recover_text(&recovered));
}
