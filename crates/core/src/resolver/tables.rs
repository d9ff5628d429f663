//! Curated lookup tables for the menu resolver.
//!
//! Entries are written in normalized form. They are domain content for the
//! demo pizzeria, not part of the matching algorithm; a deployment with a
//! different menu passes its own tables to [`super::MenuResolver::with_tables`].

/// Alias key → canonical item-name fragment. Evaluated top to bottom.
pub const ALIASES: &[(&str, &str)] = &[
    ("margherita", "margherita"),
    ("marguerita", "margherita"),
    ("margarita", "margherita"),
    ("margerita", "margherita"),
    ("calabresa", "calabresa"),
    ("calabreza", "calabresa"),
    ("portuguesa", "portuguesa"),
    ("portugueza", "portuguesa"),
    ("quatro queijos", "4 queijos"),
    ("4 queijos", "4 queijos"),
    ("tres queijos", "3 queijos"),
    ("3 queijos", "3 queijos"),
    ("dois queijos", "2 queijos"),
    ("2 queijos", "2 queijos"),
    ("quatro carnes", "4 carnes"),
    ("4 carnes", "4 carnes"),
    ("file mignon", "file mignon"),
    ("file", "file mignon"),
    ("mignon", "file mignon"),
    ("strogonoff", "strogonoff"),
    ("estrogonofe", "strogonoff"),
    ("strogonofe", "strogonoff"),
    ("estrogonoff", "strogonoff"),
    ("mucarela", "mussarela"),
    ("muzzarela", "mussarela"),
    ("mozzarella", "mussarela"),
    ("presunto", "presunto e queijo"),
    ("coca cola", "coca cola"),
    ("coca", "coca cola"),
    ("guarana", "guarana"),
    ("suco de laranja", "suco de laranja"),
    ("suco", "suco"),
];

/// Word sets that must all appear in the query and in the item name.
/// More specific groups come first.
pub const KEYWORD_GROUPS: &[&[&str]] = &[
    &["borda", "catupiry", "bacon"],
    &["borda", "cheddar", "catupiry"],
    &["borda", "chocolate", "branco"],
    &["borda", "bacon"],
    &["borda", "cheddar"],
    &["borda", "chocolate"],
    &["borda", "mussarela"],
    &["borda", "catupiry"],
    &["frango", "especial"],
    &["frango", "melt"],
    &["frango", "catupiry"],
    &["lombo", "catupiry"],
    &["palmito", "catupiry"],
    &["milho", "catupiry"],
    &["presunto", "queijo"],
];

/// Words that never identify a menu item on their own: greetings, generic
/// verbs, articles and the names of the commands.
pub const STOP_WORDS: &[&str] = &[
    "oi", "ola", "opa", "bom", "boa", "dia", "tarde", "noite", "tudo", "bem", "como", "vai",
    "obrigado", "obrigada", "valeu", "tchau", "beleza", "eai", "sim", "nao", "por", "favor",
    "quero", "queria", "vou", "querer", "pedir", "pedido", "fazer", "gostaria", "adicionar",
    "adiciona", "manda", "pode", "ser", "ver", "mostrar", "mostra", "me", "eu", "voce",
    "cardapio", "menu", "opcoes", "sabores", "preco", "precos", "valor", "quanto", "custa",
    "ingrediente", "ingredientes", "tem", "que", "feita", "feito", "qual", "quais", "finalizar",
    "continuar", "pizza", "pizzas", "uma", "um", "uns", "umas", "a", "o", "as", "os", "de",
    "da", "do", "das", "dos", "com", "e", "no", "na", "essa", "esse", "isso", "ai", "mais", "sem",
    "tirar", "tira",
];
