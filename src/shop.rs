use crate::error::{PetError, Refusal};
use crate::model::{Accessory, FoodKind, PetEvent, PetState};
use crate::progression::classify_evolution;
use crate::rules::Rules;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Item {
    Food(FoodKind),
    Accessory(Accessory),
}

pub const CATALOG: [Item; 6] = [
    Item::Food(FoodKind::Junk),
    Item::Food(FoodKind::Healthy),
    Item::Food(FoodKind::Premium),
    Item::Accessory(Accessory::Bow),
    Item::Accessory(Accessory::Hat),
    Item::Accessory(Accessory::Scarf),
];

impl Item {
    /// `None` for things that cannot be bought (standard food is free).
    pub fn price(self) -> Option<u32> {
        match self {
            Item::Food(FoodKind::Standard) => None,
            Item::Food(FoodKind::Junk) => Some(5),
            Item::Food(FoodKind::Healthy) => Some(12),
            Item::Food(FoodKind::Premium) => Some(30),
            Item::Accessory(_) => Some(50),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub item: Item,
    pub price: u32,
    pub coins_left: u32,
}

pub fn purchase(state: &mut PetState, item: Item) -> Result<Receipt, PetError> {
    state.ensure_alive()?;
    let price = item
        .price()
        .ok_or_else(|| PetError::InvalidInput(format!("{item:?} is not for sale")))?;
    if let Item::Accessory(acc) = item {
        if state.inventory.accessories.contains(&acc) {
            return Err(PetError::Refused(Refusal::AlreadyOwned));
        }
    }
    if state.coins < price {
        return Err(PetError::Refused(Refusal::NotEnoughCoins {
            price,
            coins: state.coins,
        }));
    }

    state.coins -= price;
    match item {
        Item::Food(food) => *state.inventory.food.entry(food).or_insert(0) += 1,
        Item::Accessory(acc) => {
            state.inventory.accessories.insert(acc);
        }
    }
    log::info!("bought {:?} for {} coins", item, price);
    Ok(Receipt {
        item,
        price,
        coins_left: state.coins,
    })
}

/// Equipping changes the premium archetype score, so evolution is
/// re-classified.
pub fn equip(
    state: &mut PetState,
    accessory: Accessory,
    rules: &Rules,
) -> Result<Vec<PetEvent>, PetError> {
    state.ensure_alive()?;
    if !state.inventory.accessories.contains(&accessory) {
        return Err(PetError::Refused(Refusal::NotOwned));
    }
    state.inventory.equipped_accessory = Some(accessory);
    Ok(classify_evolution(state, rules).into_iter().collect())
}

pub fn unequip(state: &mut PetState, rules: &Rules) -> Result<Vec<PetEvent>, PetError> {
    state.ensure_alive()?;
    state.inventory.equipped_accessory = None;
    Ok(classify_evolution(state, rules).into_iter().collect())
}
